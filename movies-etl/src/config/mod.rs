//! Configuration and dependency wiring for the movies ETL.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{EtlConfig, LogFormat};
