// Adapters layer: concrete implementations of the domain ports (filesystem storage, CSV dumps).

pub mod csv_sink;
pub mod storage;

pub use crate::domain::ports::NoopSink;
pub use csv_sink::CsvMatrixSink;
pub use storage::LocalStorage;
