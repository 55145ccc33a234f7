//! Query error types.

use thiserror::Error;

/// Errors from the strict query-building entry points.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The query is missing something the server would reject it for.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A configuration value could not be used.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failed to serialize a query or a document payload to JSON.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl QueryError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
