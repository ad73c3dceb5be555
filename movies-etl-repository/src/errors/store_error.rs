//! Relational store error types.

use thiserror::Error;

/// Errors that can occur while reading from the relational store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Could not obtain a connection (refused, pool closed, TLS failure).
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The query itself failed on the server.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Acquiring a connection or running the query took too long.
    #[error("Store operation timed out")]
    Timeout,

    /// A column could not be read as its expected type.
    #[error("Failed to decode column {column}: {reason}")]
    DecodeError { column: String, reason: String },
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a decode error.
    pub fn decode(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DecodeError {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Infrastructure failures are transient; a row that does not match its
    /// schema will not decode any better on the next attempt.
    pub fn is_transient(&self) -> bool {
        !matches!(self, StoreError::DecodeError { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Protocol(_) => StoreError::connection(err.to_string()),
            sqlx::Error::ColumnDecode { index, source } => StoreError::decode(index, source.to_string()),
            sqlx::Error::ColumnNotFound(column) => StoreError::decode(column, "column not found"),
            sqlx::Error::Decode(source) => StoreError::decode("<unknown>", source.to_string()),
            other => StoreError::query(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_is_not_transient() {
        assert!(!StoreError::decode("rating", "not a float").is_transient());
        assert!(StoreError::Timeout.is_transient());
        assert!(StoreError::connection("refused").is_transient());
        assert!(StoreError::query("syntax error").is_transient());
    }

    #[test]
    fn test_from_sqlx_pool_timeout() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Timeout));
    }

    #[test]
    fn test_from_sqlx_column_not_found() {
        let err: StoreError = sqlx::Error::ColumnNotFound("genres".to_string()).into();
        assert!(matches!(err, StoreError::DecodeError { ref column, .. } if column == "genres"));
        assert!(!err.is_transient());
    }
}
