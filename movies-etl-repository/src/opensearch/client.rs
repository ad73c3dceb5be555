//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    http::{
        headers::{HeaderMap, HeaderValue, CONTENT_TYPE},
        transport::{SingleNodeConnectionPool, TransportBuilder},
        Method,
    },
    indices::{IndicesCreateParts, IndicesExistsParts},
    OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;

/// Path of the bulk indexing endpoint, relative to the base URL.
const BULK_PATH: &str = "/_bulk";

/// Content type of newline-delimited bulk bodies.
const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200").await?;
/// client.ping().await?;
/// let raw = client.bulk(body).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client for the specified URL.
    ///
    /// No request is made; reachability is checked separately with `ping`.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or the transport cannot be built
    pub async fn new(url: &str) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self { client })
    }

    /// Read the body of a non-success response into a status error.
    async fn status_error(response: opensearch::http::response::Response) -> SearchError {
        let status = response.status_code();
        let body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %body, "Request failed");
        SearchError::status(status.as_u16(), body)
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    async fn ping(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(Self::status_error(response).await);
        }

        Ok(())
    }

    #[instrument(skip(self, body), fields(bytes = body.len()))]
    async fn bulk(&self, body: String) -> Result<String, SearchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(NDJSON_CONTENT_TYPE));

        let response = self
            .client
            .send(
                Method::Post,
                BULK_PATH,
                headers,
                Option::<&Value>::None,
                Some(body),
                None,
            )
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(Self::status_error(response).await);
        }

        let text = response
            .text()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        debug!(response_bytes = text.len(), "Bulk request completed");
        Ok(text)
    }

    async fn ensure_index_exists(&self, index: &str, settings: &Value) -> Result<(), SearchError> {
        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if exists.status_code().is_success() {
            debug!(index = %index, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(settings.clone())
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if status.is_success() {
            info!(index = %index, "Created index");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();

        // Another writer created it between the two requests
        if body.contains("resource_already_exists_exception") {
            return Ok(());
        }

        error!(status = %status, body = %body, "Index creation failed");
        Err(SearchError::IndexCreationError(format!(
            "Index creation failed with status {}: {}",
            status, body
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_rejects_invalid_url() {
        let result = OpenSearchClient::new("not a url").await;
        assert!(matches!(result, Err(SearchError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_new_does_not_connect() {
        // Nothing listens on this port; construction must still succeed.
        let result = OpenSearchClient::new("http://127.0.0.1:9").await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_bulk_endpoint() {
        assert_eq!(BULK_PATH, "/_bulk");
        assert_eq!(NDJSON_CONTENT_TYPE, "application/x-ndjson");
    }
}
