pub mod assembler;
pub mod engine;
pub mod entities;
pub mod file_matrix;
pub mod generator;
pub mod issue_matrix;
pub mod module_matrix;
pub mod partition;
pub mod sampling;

pub use crate::domain::ports::{MatrixSink, Storage};
pub use crate::utils::error::Result;
