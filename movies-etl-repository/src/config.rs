//! Configuration types for the store and search index adapters.

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

/// Default OpenSearch URL.
pub const DEFAULT_SEARCH_URL: &str = "http://localhost:9200";

/// Default target index for movie documents.
pub const DEFAULT_INDEX_NAME: &str = "movies";

/// Connection settings for the relational store.
#[derive(Clone)]
pub struct StoreConfig {
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// How long to wait for a connection before the attempt counts as failed.
    pub acquire_timeout: Duration,
}

impl StoreConfig {
    /// Build sqlx connect options from these settings.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.dbname)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dbname: "movies".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            host: "localhost".to_string(),
            port: 5432,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// Settings for the search index the documents are loaded into.
#[derive(Debug, Clone)]
pub struct SearchIndexConfig {
    /// Base URL of the search engine.
    pub url: String,
    /// Name of the index receiving movie documents.
    pub index_name: String,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEARCH_URL.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
        }
    }
}
