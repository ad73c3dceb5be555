//! Wire types for the bulk indexing API.

use serde::Deserialize;
use serde_json::Value;

/// The parts of a `_bulk` response the loader relies on.
///
/// Deserialization fails when `items` is missing or an item lacks its
/// `index` object, which callers treat as a protocol failure.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkResponse {
    /// Whether any item failed, as reported by the engine.
    #[serde(default)]
    pub errors: bool,
    /// One entry per action line, in request order.
    pub items: Vec<BulkResponseItem>,
}

/// A single action result in a bulk response.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkResponseItem {
    pub index: BulkItemResult,
}

/// Outcome of indexing one document.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItemResult {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    /// Present and non-null only when this document failed.
    #[serde(default)]
    pub error: Option<Value>,
}

/// A document the engine refused while its siblings may have been indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemFailure {
    /// Document id, when the engine echoed it back.
    pub id: Option<String>,
    pub status: Option<u16>,
    /// The engine's error object rendered as JSON.
    pub reason: String,
}

/// Summary of a bulk request containing aggregate statistics and failed items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkSummary {
    /// Total number of items in the response.
    pub total: usize,
    /// Number of documents indexed.
    pub succeeded: usize,
    /// Number of documents refused.
    pub failed: usize,
    /// Details for each refused document, in response order.
    pub failures: Vec<BulkItemFailure>,
}

impl BulkResponse {
    /// Split the items into successes and per-document failures.
    pub fn summarize(&self) -> BulkSummary {
        let failures: Vec<BulkItemFailure> = self
            .items
            .iter()
            .filter_map(|item| {
                item.index.error.as_ref().map(|error| BulkItemFailure {
                    id: item.index.id.clone(),
                    status: item.index.status,
                    reason: error.to_string(),
                })
            })
            .collect();

        BulkSummary {
            total: self.items.len(),
            succeeded: self.items.len() - failures.len(),
            failed: failures.len(),
            failures,
        }
    }
}
