//! # Movies ETL Repository
//!
//! This crate provides the traits and implementations the pipeline uses to
//! talk to the outside world: a PostgreSQL source of changed movie rows and
//! an OpenSearch client for bulk indexing. It includes definitions for
//! errors, interfaces, and the bulk wire types.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod postgres;
pub mod types;

pub use config::{SearchIndexConfig, StoreConfig};
pub use errors::{SearchError, StoreError};
pub use interfaces::{MovieSource, SearchEngineClient};
pub use opensearch::OpenSearchClient;
pub use postgres::PostgresMovieSource;
pub use types::{BulkItemFailure, BulkResponse, BulkSummary};
