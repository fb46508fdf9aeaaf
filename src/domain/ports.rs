use crate::domain::matrix::{FileMatrix, IssueMatrix, ModuleMatrix};
use crate::utils::error::Result;

pub trait Storage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// Receives the intermediate per-layer matrices of each repository for inspection.
pub trait MatrixSink {
    fn file_matrix(&mut self, repo: &str, matrix: &FileMatrix) -> Result<()>;
    fn module_matrix(&mut self, repo: &str, matrix: &ModuleMatrix) -> Result<()>;
    fn issue_matrix(&mut self, repo: &str, matrix: &IssueMatrix) -> Result<()>;

    /// Called once after the last repository.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Discards every matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl MatrixSink for NoopSink {
    fn file_matrix(&mut self, _repo: &str, _matrix: &FileMatrix) -> Result<()> {
        Ok(())
    }

    fn module_matrix(&mut self, _repo: &str, _matrix: &ModuleMatrix) -> Result<()> {
        Ok(())
    }

    fn issue_matrix(&mut self, _repo: &str, _matrix: &IssueMatrix) -> Result<()> {
        Ok(())
    }
}

impl<T: MatrixSink + ?Sized> MatrixSink for &mut T {
    fn file_matrix(&mut self, repo: &str, matrix: &FileMatrix) -> Result<()> {
        (**self).file_matrix(repo, matrix)
    }

    fn module_matrix(&mut self, repo: &str, matrix: &ModuleMatrix) -> Result<()> {
        (**self).module_matrix(repo, matrix)
    }

    fn issue_matrix(&mut self, repo: &str, matrix: &IssueMatrix) -> Result<()> {
        (**self).issue_matrix(repo, matrix)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}
