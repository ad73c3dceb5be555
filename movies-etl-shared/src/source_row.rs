//! The wide relational row produced by the extraction query.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

/// One movie with its related entities aggregated into lists.
///
/// Scalar columns the store allows to be null are `Option`; the transformer
/// decides which of them a document requires. Aggregates are deduplicated by
/// the query and are empty, never absent, when no related row exists.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub id: Uuid,
    pub created: NaiveDateTime,
    pub modified: NaiveDateTime,
    pub title: String,
    pub description: Option<String>,
    pub create_date: Option<NaiveDate>,
    pub age_qualification: Option<i32>,
    pub rating: Option<f64>,
    pub file: Option<String>,
    /// Category titles; a well-formed movie has exactly one.
    pub categories: Vec<String>,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub writers: Vec<String>,
    pub directors: Vec<String>,
    /// Latest change of the driving table that selected this movie, as an
    /// absolute instant. Comparable with `ChangeCutoff::Since`.
    pub changed_at: DateTime<Utc>,
}
