//! Dependency initialization and wiring for the movies ETL.

use std::sync::Arc;
use tracing::info;

use crate::config::EtlConfig;
use crate::EtlError;
use movies_etl_pipeline::{Extractor, MovieLoader, MovieTransformer, Orchestrator, OrchestratorConfig};
use movies_etl_repository::{OpenSearchClient, PostgresMovieSource};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// The store handle, kept so the pool can be closed on shutdown.
    pub source: Arc<PostgresMovieSource>,
}

impl Dependencies {
    /// Build every component from resolved settings.
    ///
    /// Neither the store nor the search engine is contacted here; the first
    /// run does that under the retry policy.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(EtlError)` - If a client cannot be constructed
    pub async fn new(config: EtlConfig) -> Result<Self, EtlError> {
        info!(
            store = ?config.store,
            opensearch_url = %config.search.url,
            index = %config.search.index_name,
            "Initializing dependencies"
        );

        let source = Arc::new(PostgresMovieSource::new(&config.store));

        let search_client = OpenSearchClient::new(&config.search.url)
            .await
            .map_err(|e| EtlError::config(format!("Failed to create OpenSearch client: {}", e)))?;

        let extractor = Extractor::new(source.clone(), config.retry.clone());
        let transformer = MovieTransformer::new();
        let loader = MovieLoader::new(Arc::new(search_client), config.retry, config.search.index_name);

        let orchestrator = Orchestrator::with_config(
            extractor,
            transformer,
            loader,
            OrchestratorConfig {
                entities: config.entities,
                create_index: config.create_index,
            },
        );

        Ok(Self { orchestrator, source })
    }
}
