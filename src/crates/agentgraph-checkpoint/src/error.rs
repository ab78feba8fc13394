//! Error types for checkpoint operations.

use thiserror::Error;

/// Convenience result type using [`CheckpointError`].
pub type Result<T> = std::result::Result<T, CheckpointError>;

/// Errors raised by checkpoint stores and serializers.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The request was malformed (e.g. an empty thread id).
    #[error("Invalid checkpoint request: {0}")]
    Invalid(String),

    /// No checkpoint exists for the requested thread.
    #[error("Checkpoint not found for thread '{0}'")]
    NotFound(String),

    /// The backing store failed (I/O, connection, ...).
    #[error("Checkpoint storage error: {0}")]
    Storage(String),

    /// State could not be serialized or deserialized.
    #[error("Checkpoint serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CheckpointError {
    fn from(err: serde_json::Error) -> Self {
        CheckpointError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for CheckpointError {
    fn from(err: bincode::Error) -> Self {
        CheckpointError::Serialization(err.to_string())
    }
}
