//! Transformer module for the movies ETL pipeline.
//!
//! Flattens wide relational rows into movie documents. No I/O happens here.

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::errors::PipelineError;
use movies_etl_shared::{format_date, format_instant, MovieDocument, SourceRow};

/// Transformer that maps source rows onto the canonical movie document.
///
/// The transformer is responsible for:
/// - Formatting instants and dates into the fixed wire formats
/// - Reducing the category aggregate to its single element
/// - Rejecting rows that lack a field every document must carry
#[derive(Debug, Default)]
pub struct MovieTransformer {}

impl MovieTransformer {
    /// Create a new movie transformer.
    pub fn new() -> Self {
        Self {}
    }

    /// Transform a batch of rows, failing on the first malformed row.
    #[instrument(skip(self, rows), fields(row_count = rows.len()))]
    pub fn transform_batch(&self, rows: Vec<SourceRow>) -> Result<Vec<MovieDocument>, PipelineError> {
        let documents = rows
            .into_iter()
            .map(|row| self.transform(row))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(document_count = documents.len(), "Transformed batch");
        Ok(documents)
    }

    /// Transform a single row into exactly one document.
    pub fn transform(&self, row: SourceRow) -> Result<MovieDocument, PipelineError> {
        let id = row.id;

        let category = row
            .categories
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::data_shape(id, "category aggregate is empty"))?;

        let create_date = required(id, "create_date", row.create_date)?;

        Ok(MovieDocument {
            id,
            title: row.title,
            description: required(id, "description", row.description)?,
            created: format_instant(&row.created),
            modified: format_instant(&row.modified),
            create_date: format_date(&create_date),
            age_qualification: required(id, "age_qualification", row.age_qualification)?,
            rating: required(id, "rating", row.rating)?,
            file: required(id, "file", row.file)?,
            category,
            genres: row.genres,
            actors: row.actors,
            writers: row.writers,
            directors: row.directors,
        })
    }
}

fn required<T>(movie_id: Uuid, field: &str, value: Option<T>) -> Result<T, PipelineError> {
    value.ok_or_else(|| PipelineError::data_shape(movie_id, format!("{} is null", field)))
}
