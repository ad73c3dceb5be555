//! The canonical movie document stored in the search index.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A flattened movie ready for indexing.
///
/// Timestamps are pre-formatted strings (see [`crate::INSTANT_FORMAT`] and
/// [`crate::DATE_FORMAT`]); the list fields are always serialized, as `[]`
/// when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDocument {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created: String,
    pub modified: String,
    pub create_date: String,
    pub age_qualification: i32,
    pub rating: f64,
    pub file: String,
    pub category: String,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub writers: Vec<String>,
    pub directors: Vec<String>,
}
