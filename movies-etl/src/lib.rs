//! # Movies ETL
//!
//! Main library for the incremental movies ETL.
//!
//! This crate provides the entry point, configuration and logging setup for
//! running the movies pipeline.

pub mod config;
pub mod logging;

pub use config::{Dependencies, EtlConfig, LogFormat};

use thiserror::Error;

/// Errors that can occur during ETL initialization or execution.
#[derive(Error, Debug)]
pub enum EtlError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] movies_etl_pipeline::PipelineError),
}

impl EtlError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
