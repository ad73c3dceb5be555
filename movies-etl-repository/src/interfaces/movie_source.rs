//! Movie source trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::StoreError;
use movies_etl_shared::{ChangeCutoff, EntityKind, SourceRow};

/// Read-only access to changed movie rows in the relational store.
#[async_trait]
pub trait MovieSource: Send + Sync {
    /// Fetch up to `limit` movies whose `kind` table changed after `cutoff`.
    ///
    /// # Arguments
    ///
    /// * `kind` - The entity whose `modified` column gates selection
    /// * `cutoff` - Only changes strictly after this boundary are selected
    /// * `after` - Keyset position: only movies with an id greater than this
    /// * `limit` - Maximum rows to return; implementations clamp it to
    ///   [`movies_etl_shared::MAX_BATCH_SIZE`]
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SourceRow>)` - At most `limit` rows, order unspecified
    /// * `Err(StoreError)` - If the connection, query or decoding fails
    async fn fetch_changed(
        &self,
        kind: EntityKind,
        cutoff: ChangeCutoff,
        after: Option<Uuid>,
        limit: usize,
    ) -> Result<Vec<SourceRow>, StoreError>;
}
