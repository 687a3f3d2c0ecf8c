//! Error types for format operations

use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Input is not a valid document of the expected format
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

impl FormatError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        FormatError::MalformedInput(msg.into())
    }

    /// Wraps a JSON decoding failure, keeping serde's line/column detail.
    pub(crate) fn from_decode(err: serde_json::Error) -> Self {
        FormatError::MalformedInput(err.to_string())
    }

    pub(crate) fn from_encode(err: serde_json::Error) -> Self {
        FormatError::SerializationError(err.to_string())
    }
}
