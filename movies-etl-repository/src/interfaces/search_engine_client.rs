//! Search engine client trait definition.
//!
//! This module defines the abstract interface for the search engine operations
//! the loader needs, allowing for different backend implementations
//! (OpenSearch, Elasticsearch, mocks).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;

/// Abstract interface for search engine operations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Check that the search engine is reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the engine answered
    /// * `Err(SearchError)` - If it could not be reached or answered with an error
    async fn ping(&self) -> Result<(), SearchError>;

    /// Submit a pre-built newline-delimited bulk body.
    ///
    /// Per-item failures are not errors at this level; they are reported in
    /// the returned body and interpreted by the caller.
    ///
    /// # Arguments
    ///
    /// * `body` - Action/document line pairs, each newline-terminated
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The raw response body of a successful request
    /// * `Err(SearchError)` - On connection failure or non-success status
    async fn bulk(&self, body: String) -> Result<String, SearchError>;

    /// Create `index` with the given settings and mappings unless it exists.
    async fn ensure_index_exists(&self, index: &str, settings: &Value) -> Result<(), SearchError>;
}
