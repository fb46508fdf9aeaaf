// Per-layer transition tables produced by the synthesizers for one repository.

use crate::utils::error::{Result, SynthError};
use crate::utils::validation::{check_probability, round_to, OUTPUT_ROUNDING};

#[derive(Debug, Clone, PartialEq)]
pub struct FileAuthor {
    pub author: String,
    /// Probability of leaving the file layer for `author`.
    pub escape: f64,
}

/// Square File×File matrix (block diagonal by group) plus each file's author escape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMatrix {
    pub files: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub authors: Vec<FileAuthor>,
}

impl FileMatrix {
    pub fn with_files(files: Vec<String>) -> Self {
        let n = files.len();
        Self {
            files,
            rows: vec![vec![0.0; n]; n],
            authors: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn row_sum(&self, i: usize) -> f64 {
        self.rows[i].iter().sum()
    }

    /// Every file must split its mass between files and its author.
    pub fn check(&self) -> Result<()> {
        if self.authors.len() != self.files.len() || self.rows.len() != self.files.len() {
            return Err(SynthError::invariant(
                "file matrix",
                format!(
                    "{} files but {} rows and {} bound authors",
                    self.files.len(),
                    self.rows.len(),
                    self.authors.len()
                ),
            ));
        }
        for (i, file) in self.files.iter().enumerate() {
            let total = self.row_sum(i) + self.authors[i].escape;
            if round_to(total, OUTPUT_ROUNDING) != 1.0 {
                return Err(SynthError::invariant(
                    format!("file {}", file),
                    format!("transitions sum to {} instead of 1", total),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedRow {
    pub id: String,
    /// Distinct targets with their weights, in first-sampled order.
    pub weights: Vec<(String, f64)>,
}

impl WeightedRow {
    pub fn check(&self, kind: &str) -> Result<()> {
        let values: Vec<f64> = self.weights.iter().map(|(_, p)| *p).collect();
        if check_probability(&values) {
            return Ok(());
        }
        Err(SynthError::invariant(
            format!("{} {}", kind, self.id),
            format!("weights sum to {}", values.iter().sum::<f64>()),
        ))
    }
}

/// Module→File weights of the modules that kept at least one file in the repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleMatrix {
    pub modules: Vec<WeightedRow>,
}

impl ModuleMatrix {
    pub fn retained_ids(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.id.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueRow {
    pub row: WeightedRow,
    pub average_consecutive_commits: f64,
}

/// Issue→Module weights of the issues that kept at least one module in the repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueMatrix {
    pub issues: Vec<IssueRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_matrix_check_names_offending_file() {
        let mut matrix = FileMatrix::with_files(vec!["File_0".into(), "File_1".into()]);
        matrix.rows[0][1] = 0.5;
        matrix.authors.push(FileAuthor {
            author: "Author_0".into(),
            escape: 0.5,
        });
        matrix.authors.push(FileAuthor {
            author: "Author_0".into(),
            escape: 0.7,
        });

        let err = matrix.check().unwrap_err();
        assert!(err.to_string().contains("File_1"));
    }

    #[test]
    fn test_weighted_row_check() {
        let row = WeightedRow {
            id: "Module_0".into(),
            weights: vec![("File_0".into(), 0.25), ("File_3".into(), 0.75)],
        };
        assert!(row.check("module").is_ok());

        let bad = WeightedRow {
            id: "Module_1".into(),
            weights: vec![("File_0".into(), 0.25)],
        };
        assert!(bad.check("module").is_err());
    }
}
