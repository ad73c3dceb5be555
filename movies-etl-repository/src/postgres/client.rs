//! PostgreSQL movie source.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::interfaces::MovieSource;
use crate::postgres::queries::changed_movies_query;
use movies_etl_shared::{ChangeCutoff, EntityKind, SourceRow, MAX_BATCH_SIZE};

/// Reads changed movies from the relational store.
///
/// The pool holds a single connection and is created lazily, so a store that
/// is down surfaces as a failed query inside the caller's retry scope rather
/// than as a construction error. Connections are returned to the pool when
/// each query finishes, on success and on error.
pub struct PostgresMovieSource {
    pool: PgPool,
}

impl PostgresMovieSource {
    /// Create a source for the given store settings without connecting.
    pub fn new(config: &StoreConfig) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy_with(config.connect_options());

        info!(
            host = %config.host,
            port = config.port,
            dbname = %config.dbname,
            "Created PostgreSQL movie source"
        );

        Self { pool }
    }

    /// Close the pool, waiting for the connection to be released.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn decode_row(row: &PgRow) -> Result<SourceRow, StoreError> {
        Ok(SourceRow {
            id: row.try_get("id")?,
            created: row.try_get("created")?,
            modified: row.try_get("modified")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            create_date: row.try_get("create_date")?,
            age_qualification: row.try_get("age_qualification")?,
            rating: row.try_get("rating")?,
            file: row.try_get("file")?,
            categories: row.try_get("categories")?,
            genres: row.try_get("genres")?,
            actors: row.try_get("actors")?,
            writers: row.try_get("writers")?,
            directors: row.try_get("directors")?,
            changed_at: row.try_get("changed_at")?,
        })
    }
}

#[async_trait]
impl MovieSource for PostgresMovieSource {
    #[instrument(skip(self), fields(entity = %kind))]
    async fn fetch_changed(
        &self,
        kind: EntityKind,
        cutoff: ChangeCutoff,
        after: Option<Uuid>,
        limit: usize,
    ) -> Result<Vec<SourceRow>, StoreError> {
        let limit = limit.min(MAX_BATCH_SIZE) as i64;
        let sql = changed_movies_query(kind);
        let since: Option<DateTime<Utc>> = cutoff.instant();

        let rows = sqlx::query(&sql)
            .bind(since)
            .bind(after)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let movies = rows
            .iter()
            .map(Self::decode_row)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = movies.len(), "Fetched changed movies");
        Ok(movies)
    }
}
