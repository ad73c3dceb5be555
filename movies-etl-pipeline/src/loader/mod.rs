//! Loader module for the movies ETL pipeline.
//!
//! Loads movie documents into the search index through the bulk API.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::errors::PipelineError;
use crate::retry::RetryPolicy;
use movies_etl_repository::opensearch::movies_index_settings;
use movies_etl_repository::{BulkResponse, BulkSummary, SearchEngineClient};
use movies_etl_shared::MovieDocument;

/// Loader that bulk-indexes movie documents.
///
/// The loader is responsible for:
/// - Building the newline-delimited bulk body
/// - Checking the engine is reachable before each load
/// - Retrying transient failures of the whole request
/// - Logging documents the engine refused without failing the batch
pub struct MovieLoader {
    client: Arc<dyn SearchEngineClient>,
    retry: RetryPolicy,
    index_name: String,
}

impl MovieLoader {
    /// Create a new loader writing into `index_name`.
    pub fn new(
        client: Arc<dyn SearchEngineClient>,
        retry: RetryPolicy,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            retry,
            index_name: index_name.into(),
        }
    }

    /// The index documents are written into.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Index a batch of documents.
    ///
    /// Documents refused by the engine are logged and counted in the returned
    /// summary; only whole-request failures that outlast the retry policy are
    /// returned as errors.
    #[instrument(skip(self, documents), fields(index = %self.index_name, count = documents.len()))]
    pub async fn load(&self, documents: &[MovieDocument]) -> Result<BulkSummary, PipelineError> {
        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }

        self.retry
            .run(
                "search_ping",
                |e: &PipelineError| e.is_transient(),
                move || async move { self.client.ping().await.map_err(PipelineError::from) },
            )
            .await?;

        let body = build_bulk_body(&self.index_name, documents)?;

        let summary = self
            .retry
            .run(
                "bulk_index",
                |e: &PipelineError| e.is_transient(),
                || {
                    let body = body.clone();
                    async move {
                        let raw = self.client.bulk(body).await?;
                        parse_bulk_response(&raw)
                    }
                },
            )
            .await?;

        for failure in &summary.failures {
            error!(
                movie_id = failure.id.as_deref().unwrap_or("<unknown>"),
                status = ?failure.status,
                reason = %failure.reason,
                "Failed to index document"
            );
        }

        if summary.failed > 0 {
            info!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Bulk index completed with failures"
            );
        } else {
            debug!(count = summary.succeeded, "Bulk index completed");
        }

        Ok(summary)
    }

    /// Create the target index with the movie mapping unless it exists.
    pub async fn ensure_index(&self) -> Result<(), PipelineError> {
        let settings = &movies_index_settings();
        self.retry
            .run(
                "ensure_index",
                |e: &PipelineError| e.is_transient(),
                move || async move {
                    self.client
                        .ensure_index_exists(&self.index_name, settings)
                        .await
                        .map_err(PipelineError::from)
                },
            )
            .await
    }
}

/// Build a bulk body: one action line and one document line per document,
/// each terminated by a newline.
pub fn build_bulk_body(index_name: &str, documents: &[MovieDocument]) -> Result<String, PipelineError> {
    let mut body = String::new();

    for doc in documents {
        let action = serde_json::json!({
            "index": { "_index": index_name, "_id": doc.id.to_string() }
        });
        let source = serde_json::to_string(doc)
            .map_err(|e| PipelineError::loader(format!("Failed to serialize movie {}: {}", doc.id, e)))?;

        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&source);
        body.push('\n');
    }

    Ok(body)
}

/// Parse a bulk response body into a summary of per-item outcomes.
///
/// A body that is not JSON or lacks the `items` array is a protocol error,
/// which is retried like a connection failure.
pub fn parse_bulk_response(raw: &str) -> Result<BulkSummary, PipelineError> {
    let response: BulkResponse = serde_json::from_str(raw)
        .map_err(|e| PipelineError::protocol(format!("Unreadable bulk response: {}", e)))?;

    Ok(response.summarize())
}
