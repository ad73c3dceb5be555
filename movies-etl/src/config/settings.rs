//! Environment-driven settings for the movies ETL.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::EtlError;
use movies_etl_pipeline::RetryPolicy;
use movies_etl_repository::config::{DEFAULT_INDEX_NAME, DEFAULT_SEARCH_URL};
use movies_etl_repository::{SearchIndexConfig, StoreConfig};
use movies_etl_shared::{ChangeCutoff, EntityKind};

/// Default Postgres host.
const DEFAULT_POSTGRES_HOST: &str = "localhost";

/// Default Postgres port.
const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Fully resolved ETL settings.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub store: StoreConfig,
    pub search: SearchIndexConfig,
    /// Entity kinds processed by every run, in order.
    pub entities: Vec<EntityKind>,
    pub cutoff: ChangeCutoff,
    /// Pause between scheduled runs; `None` runs once.
    pub run_interval: Option<Duration>,
    pub retry: RetryPolicy,
    pub create_index: bool,
    pub log_format: LogFormat,
}

impl EtlConfig {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `POSTGRES_DB_NAME`, `POSTGRES_USER`, `POSTGRES_PASSWORD`: required
    /// - `POSTGRES_HOST` (default: localhost), `POSTGRES_PORT` (default: 5432)
    /// - `OPENSEARCH_URL` (default: http://localhost:9200)
    /// - `ETL_INDEX_NAME` (default: movies)
    /// - `ETL_ENTITIES`: comma separated entity kinds (default: movie,person,genre)
    /// - `ETL_CUTOFF`: RFC 3339 instant (default: start of the current day)
    /// - `ETL_RUN_INTERVAL_SECS`: run on this interval instead of once
    /// - `ETL_RETRY_MAX_ATTEMPTS`, `ETL_RETRY_INITIAL_DELAY_SECS`, `ETL_RETRY_MAX_DELAY_SECS`
    /// - `ETL_CREATE_INDEX` (default: true)
    /// - `LOG_FORMAT`: `json` or `text` (default: text)
    pub fn from_env() -> Result<Self, EtlError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through an arbitrary key lookup.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the raw value for a key, or `None` when unset
    ///
    /// # Returns
    ///
    /// * `Ok(EtlConfig)` - Resolved settings
    /// * `Err(EtlError::ConfigError)` - If a required key is missing or a value does not parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EtlError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| EtlError::config(format!("{key} is not set")));

        let store = StoreConfig {
            dbname: required("POSTGRES_DB_NAME")?,
            user: required("POSTGRES_USER")?,
            password: required("POSTGRES_PASSWORD")?,
            host: get("POSTGRES_HOST").unwrap_or_else(|| DEFAULT_POSTGRES_HOST.to_string()),
            port: parse_or("POSTGRES_PORT", get("POSTGRES_PORT"), DEFAULT_POSTGRES_PORT)?,
            ..Default::default()
        };

        let search = SearchIndexConfig {
            url: get("OPENSEARCH_URL").unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
            index_name: get("ETL_INDEX_NAME").unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string()),
        };

        let entities = match get("ETL_ENTITIES") {
            Some(raw) => parse_entities(&raw)?,
            None => EntityKind::ALL.to_vec(),
        };

        let cutoff = match get("ETL_CUTOFF") {
            Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
                .map(|at| ChangeCutoff::Since(at.with_timezone(&Utc)))
                .map_err(|e| EtlError::config(format!("ETL_CUTOFF is not an RFC 3339 instant: {e}")))?,
            None => ChangeCutoff::StartOfCurrentDay,
        };

        let run_interval = get("ETL_RUN_INTERVAL_SECS")
            .map(|raw| parse_value::<u64>("ETL_RUN_INTERVAL_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);
        if run_interval == Some(Duration::ZERO) {
            return Err(EtlError::config("ETL_RUN_INTERVAL_SECS must be positive"));
        }

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy::new(
            parse_or("ETL_RETRY_MAX_ATTEMPTS", get("ETL_RETRY_MAX_ATTEMPTS"), defaults.max_attempts)?,
            secs_or("ETL_RETRY_INITIAL_DELAY_SECS", get("ETL_RETRY_INITIAL_DELAY_SECS"), defaults.initial_delay)?,
        )
        .with_max_delay(secs_or(
            "ETL_RETRY_MAX_DELAY_SECS",
            get("ETL_RETRY_MAX_DELAY_SECS"),
            defaults.max_delay,
        )?);

        let create_index = match get("ETL_CREATE_INDEX") {
            Some(raw) => parse_bool("ETL_CREATE_INDEX", &raw)?,
            None => true,
        };

        let log_format = match get("LOG_FORMAT").map(|raw| raw.trim().to_ascii_lowercase()) {
            None => LogFormat::default(),
            Some(raw) if raw == "text" => LogFormat::Text,
            Some(raw) if raw == "json" => LogFormat::Json,
            Some(raw) => return Err(EtlError::config(format!("LOG_FORMAT must be json or text, got {raw}"))),
        };

        Ok(Self {
            store,
            search,
            entities,
            cutoff,
            run_interval,
            retry,
            create_index,
            log_format,
        })
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, EtlError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| EtlError::config(format!("{key} has invalid value {raw:?}: {e}")))
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, EtlError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn secs_or(key: &str, raw: Option<String>, default: Duration) -> Result<Duration, EtlError> {
    raw.map_or(Ok(default), |raw| parse_value(key, &raw).map(Duration::from_secs))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, EtlError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(EtlError::config(format!("{key} must be a boolean, got {other:?}"))),
    }
}

fn parse_entities(raw: &str) -> Result<Vec<EntityKind>, EtlError> {
    let mut entities = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let kind: EntityKind = part
            .parse()
            .map_err(|e| EtlError::config(format!("ETL_ENTITIES: {e}")))?;
        if !entities.contains(&kind) {
            entities.push(kind);
        }
    }

    if entities.is_empty() {
        return Err(EtlError::config("ETL_ENTITIES names no entity kind"));
    }
    Ok(entities)
}
