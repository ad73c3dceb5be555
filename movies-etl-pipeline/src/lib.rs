//! # Movies ETL Pipeline
//!
//! This crate provides the pipeline components for moving changed movies
//! from the relational store into the search index.
//!
//! ## Architecture
//!
//! The pipeline follows the Extractor-Transformer-Loader pattern:
//!
//! 1. **Extractor**: Pages changed movie rows out of the store
//! 2. **Transformer**: Flattens each row into a movie document
//! 3. **Loader**: Bulk-indexes documents and reports per-item failures
//! 4. **Orchestrator**: Runs the stages per entity kind, one batch at a time
//!
//! Every network call goes through a [`retry::RetryPolicy`].

pub mod errors;
pub mod extractor;
pub mod loader;
pub mod orchestrator;
pub mod retry;
pub mod transformer;

pub use errors::PipelineError;
pub use extractor::{BatchPager, Extractor};
pub use loader::MovieLoader;
pub use orchestrator::{EntityReport, Orchestrator, OrchestratorConfig, RunReport};
pub use retry::RetryPolicy;
pub use transformer::MovieTransformer;
