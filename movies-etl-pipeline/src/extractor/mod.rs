//! Extractor module for the movies ETL pipeline.
//!
//! Pulls changed movie rows out of the relational store in bounded batches.

use std::sync::Arc;

use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::errors::PipelineError;
use crate::retry::RetryPolicy;
use movies_etl_repository::MovieSource;
use movies_etl_shared::{ChangeCutoff, EntityKind, SourceRow, MAX_BATCH_SIZE};

/// Extractor that reads changed movies through a [`MovieSource`].
///
/// Every query runs under the retry policy; transient store failures are
/// retried, decoding failures are not.
pub struct Extractor {
    source: Arc<dyn MovieSource>,
    retry: RetryPolicy,
}

impl Extractor {
    /// Create a new extractor over the given source.
    pub fn new(source: Arc<dyn MovieSource>, retry: RetryPolicy) -> Self {
        Self { source, retry }
    }

    /// Fetch one batch of at most [`MAX_BATCH_SIZE`] rows.
    ///
    /// # Arguments
    ///
    /// * `kind` - The entity whose change timestamp selects movies
    /// * `cutoff` - Change boundary
    /// * `after` - Keyset position returned by the previous batch, if any
    #[instrument(skip(self), fields(entity = %kind))]
    pub async fn fetch_batch(
        &self,
        kind: EntityKind,
        cutoff: ChangeCutoff,
        after: Option<Uuid>,
    ) -> Result<Vec<SourceRow>, PipelineError> {
        let mut rows = self
            .retry
            .run(
                "extract",
                |e: &PipelineError| e.is_transient(),
                move || async move {
                    self.source
                        .fetch_changed(kind, cutoff, after, MAX_BATCH_SIZE)
                        .await
                        .map_err(PipelineError::from)
                },
            )
            .await?;

        if rows.len() > MAX_BATCH_SIZE {
            warn!(
                count = rows.len(),
                limit = MAX_BATCH_SIZE,
                "Source returned more rows than requested, truncating"
            );
            rows.truncate(MAX_BATCH_SIZE);
        }

        debug!(count = rows.len(), "Extracted batch");
        Ok(rows)
    }

    /// Page through all movies changed through `kind` after `cutoff`.
    pub fn pages(&self, kind: EntityKind, cutoff: ChangeCutoff) -> BatchPager<'_> {
        BatchPager {
            extractor: self,
            kind,
            cutoff,
            after: None,
            exhausted: false,
        }
    }
}

/// Sequential cursor over the batches of one extraction.
///
/// The next batch is only queried when the caller asks for it, so a slow
/// downstream stage holds extraction back.
pub struct BatchPager<'a> {
    extractor: &'a Extractor,
    kind: EntityKind,
    cutoff: ChangeCutoff,
    after: Option<Uuid>,
    exhausted: bool,
}

impl BatchPager<'_> {
    /// Fetch the next non-empty batch, or `None` once every changed row was returned.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<SourceRow>>, PipelineError> {
        if self.exhausted {
            return Ok(None);
        }

        let rows = self
            .extractor
            .fetch_batch(self.kind, self.cutoff, self.after)
            .await?;

        // A short page is the last one
        if rows.len() < MAX_BATCH_SIZE {
            self.exhausted = true;
        }

        if rows.is_empty() {
            return Ok(None);
        }

        // Keyset position does not depend on row order within the batch
        self.after = rows.iter().map(|row| row.id).max();

        Ok(Some(rows))
    }
}
