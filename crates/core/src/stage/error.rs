//! Error types for the stage module.

use thiserror::Error;

/// Errors that can occur while staging or resolving a payload.
#[derive(Debug, Error)]
pub enum StageError {
    /// No staged object exists for the request id.
    #[error("No staged payload for request: {request_id}")]
    NotFound { request_id: String },

    /// The key cannot be used as an object name.
    #[error("Invalid staging key: {key:?}")]
    InvalidKey { key: String },

    /// I/O error while reading the payload or writing the object.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The storage backend reported a failure.
    #[error("Staging backend error: {0}")]
    Backend(String),
}

impl StageError {
    pub fn not_found(request_id: impl Into<String>) -> Self {
        Self::NotFound {
            request_id: request_id.into(),
        }
    }
}
