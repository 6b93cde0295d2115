//! Error types for vitrine.

use thiserror::Error;

/// Result type alias using vitrine's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for catalog search operations.
///
/// An empty match set is never an error. Malformed individual attribute
/// filters are not errors either; they degrade to no-ops.
#[derive(Error, Debug)]
pub enum Error {
    /// Structurally malformed request (negative limit, unknown sort key).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Query execution against the relational store failed (wraps sqlx::Error)
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Shorthand for building an [`Error::InvalidArgument`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Whether the caller is at fault (translate to a 4xx-style response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidArgument(_) | Error::Serialization(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
