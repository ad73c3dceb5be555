//! Search error types.
//!
//! This module defines the error types that can occur while talking to the search engine.

use thiserror::Error;

/// Errors that can occur during search engine operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Failed to reach the search engine (refused, reset, timed out).
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The search engine answered with a non-success HTTP status.
    #[error("Unexpected status {status}: {body}")]
    StatusError { status: u16, body: String },

    /// Failed to create the search index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to parse response from search engine.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::StatusError {
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Connection failures, throttling (429), server-side errors (5xx) and
    /// unreadable responses are transient; client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            SearchError::ConnectionError(_) | SearchError::ParseError(_) => true,
            SearchError::StatusError { status, .. } => *status == 429 || *status >= 500,
            SearchError::IndexCreationError(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(SearchError::connection("refused").is_transient());
        assert!(SearchError::parse("eof").is_transient());
        assert!(SearchError::status(503, "unavailable").is_transient());
        assert!(SearchError::status(429, "slow down").is_transient());

        assert!(!SearchError::status(400, "bad request").is_transient());
        assert!(!SearchError::IndexCreationError("mapping".into()).is_transient());
    }
}
