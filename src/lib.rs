pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CsvMatrixSink, LocalStorage, NoopSink};
pub use config::generator_config::GeneratorConfig;
pub use core::engine::{MarkovEngine, OutputFormat};
pub use core::generator::{generate, GeneratedRepository};
pub use domain::graph::{MarkovDocument, TransitionGraph};
pub use domain::node::{NodeId, NodeKind};
pub use utils::error::{Result, SynthError};
