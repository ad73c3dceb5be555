//! Error types for the movies ETL pipeline.

use movies_etl_repository::{SearchError, StoreError};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in the movies ETL pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A row does not have the shape a movie document requires.
    #[error("Data shape error for movie {movie_id}: {reason}")]
    DataShapeError { movie_id: Uuid, reason: String },

    /// A document could not be encoded for the bulk body.
    #[error("Loader error: {0}")]
    LoaderError(String),

    /// The bulk response could not be interpreted.
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Error from the relational store.
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),
}

impl PipelineError {
    /// Create a data shape error.
    pub fn data_shape(movie_id: Uuid, reason: impl Into<String>) -> Self {
        Self::DataShapeError {
            movie_id,
            reason: reason.into(),
        }
    }

    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }

    /// Create a protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::ProtocolError(msg.into())
    }

    /// Whether the failure comes from infrastructure and may clear up on retry.
    ///
    /// Data shape errors, undecodable columns and non-retryable engine
    /// responses need manual inspection instead.
    pub fn is_transient(&self) -> bool {
        match self {
            PipelineError::DataShapeError { .. } => false,
            PipelineError::LoaderError(_) => false,
            PipelineError::ProtocolError(_) => true,
            PipelineError::StoreError(e) => e.is_transient(),
            PipelineError::SearchError(e) => e.is_transient(),
        }
    }

    /// Whether the failure is caused by the data rather than the infrastructure.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            PipelineError::DataShapeError { .. }
                | PipelineError::StoreError(StoreError::DecodeError { .. })
        )
    }
}
