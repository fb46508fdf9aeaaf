use crate::domain::matrix::{FileMatrix, IssueMatrix, ModuleMatrix};
use crate::domain::ports::MatrixSink;
use crate::utils::error::Result;
use csv::Writer;
use std::fs;
use std::path::{Path, PathBuf};

/// Dumps every layer matrix as CSV into a scratch directory.
///
/// Besides the per-repository tables, `finish` writes `filematrix.csv` and
/// `fileauthors.csv` covering the files of every repository seen so far.
#[derive(Debug, Clone)]
pub struct CsvMatrixSink {
    dir: PathBuf,
    file_matrices: Vec<FileMatrix>,
}

impl CsvMatrixSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            file_matrices: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn writer(&self, name: &str) -> Result<Writer<fs::File>> {
        let path = self.dir.join(name);
        tracing::debug!("Dumping {}", path.display());
        Ok(Writer::from_path(path)?)
    }

    fn write_file_tables<'a>(
        &self,
        suffix: &str,
        matrices: impl Iterator<Item = &'a FileMatrix> + Clone,
    ) -> Result<()> {
        let mut wtr = self.writer(&format!("filematrix{}.csv", suffix))?;
        let mut header = vec![String::new()];
        header.extend(matrices.clone().flat_map(|m| m.files.iter().cloned()));
        wtr.write_record(&header)?;

        // 其他 repository 的欄位補 0
        let width = header.len() - 1;
        let mut offset = 0;
        for matrix in matrices.clone() {
            for (file, row) in matrix.files.iter().zip(&matrix.rows) {
                let mut record = vec![file.clone()];
                record.extend((0..offset).map(|_| "0".to_string()));
                record.extend(row.iter().map(|p| p.to_string()));
                record.extend((offset + row.len()..width).map(|_| "0".to_string()));
                wtr.write_record(&record)?;
            }
            offset += matrix.len();
        }
        wtr.flush()?;

        let mut wtr = self.writer(&format!("fileauthors{}.csv", suffix))?;
        wtr.write_record(["", "AuthorName", "AuthorProb"])?;
        for matrix in matrices {
            for (file, bound) in matrix.files.iter().zip(&matrix.authors) {
                let escape = bound.escape.to_string();
                wtr.write_record([file.as_str(), bound.author.as_str(), escape.as_str()])?;
            }
        }
        wtr.flush()?;
        Ok(())
    }
}

impl MatrixSink for CsvMatrixSink {
    fn file_matrix(&mut self, repo: &str, matrix: &FileMatrix) -> Result<()> {
        self.write_file_tables(&format!("_{}", repo), std::iter::once(matrix))?;
        self.file_matrices.push(matrix.clone());
        Ok(())
    }

    fn module_matrix(&mut self, repo: &str, matrix: &ModuleMatrix) -> Result<()> {
        let mut wtr = self.writer(&format!("modulematrix_{}.csv", repo))?;
        wtr.write_record(["module", "file", "p"])?;
        for module in &matrix.modules {
            for (file, p) in &module.weights {
                let p = p.to_string();
                wtr.write_record([module.id.as_str(), file.as_str(), p.as_str()])?;
            }
        }
        wtr.flush()?;
        Ok(())
    }

    fn issue_matrix(&mut self, repo: &str, matrix: &IssueMatrix) -> Result<()> {
        let mut wtr = self.writer(&format!("issuematrix_{}.csv", repo))?;
        wtr.write_record(["issue", "module", "p", "average_consecutive_commits"])?;
        for issue in &matrix.issues {
            let commits = issue.average_consecutive_commits.to_string();
            for (module, p) in &issue.row.weights {
                let p = p.to_string();
                wtr.write_record([
                    issue.row.id.as_str(),
                    module.as_str(),
                    p.as_str(),
                    commits.as_str(),
                ])?;
            }
        }
        wtr.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let matrices = std::mem::take(&mut self.file_matrices);
        self.write_file_tables("", matrices.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::matrix::{FileAuthor, WeightedRow};
    use tempfile::TempDir;

    fn single_file(name: &str, author: &str) -> FileMatrix {
        let mut files = FileMatrix::with_files(vec![name.into()]);
        files.rows[0][0] = 0.95;
        files.authors.push(FileAuthor {
            author: author.into(),
            escape: 0.05,
        });
        files
    }

    #[test]
    fn test_dumps_file_and_module_tables() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = CsvMatrixSink::new(temp_dir.path().join("tmp")).unwrap();

        sink.file_matrix("Repo_0", &single_file("File_0", "Author_0"))
            .unwrap();
        sink.module_matrix(
            "Repo_0",
            &ModuleMatrix {
                modules: vec![WeightedRow {
                    id: "Module_0".into(),
                    weights: vec![("File_0".into(), 1.0)],
                }],
            },
        )
        .unwrap();

        let matrix = std::fs::read_to_string(sink.dir().join("filematrix_Repo_0.csv")).unwrap();
        assert!(matrix.starts_with(",File_0"));
        assert!(matrix.contains("File_0,0.95"));
        let authors = std::fs::read_to_string(sink.dir().join("fileauthors_Repo_0.csv")).unwrap();
        assert!(authors.contains("File_0,Author_0,0.05"));
        let modules = std::fs::read_to_string(sink.dir().join("modulematrix_Repo_0.csv")).unwrap();
        assert!(modules.contains("Module_0,File_0,1"));
    }

    #[test]
    fn test_finish_writes_combined_tables() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = CsvMatrixSink::new(temp_dir.path()).unwrap();

        sink.file_matrix("Repo_0", &single_file("File_0", "Author_0"))
            .unwrap();
        sink.file_matrix("Repo_1", &single_file("File_1", "Author_1"))
            .unwrap();
        sink.finish().unwrap();

        let matrix = std::fs::read_to_string(sink.dir().join("filematrix.csv")).unwrap();
        assert!(matrix.starts_with(",File_0,File_1"));
        assert!(matrix.contains("File_0,0.95,0"));
        assert!(matrix.contains("File_1,0,0.95"));

        let authors = std::fs::read_to_string(sink.dir().join("fileauthors.csv")).unwrap();
        assert!(authors.contains("File_0,Author_0,0.05"));
        assert!(authors.contains("File_1,Author_1,0.05"));
    }
}
