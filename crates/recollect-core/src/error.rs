//! Error types for recollect.

use thiserror::Error;

/// Result type alias using recollect's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ingestion operations.
///
/// Each variant maps to exactly one HTTP status class at the API boundary.
/// `Fetch` never reaches a caller: the ingestion pipeline absorbs it and
/// substitutes fallback metadata.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed or missing submission input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Access token could not be resolved to an identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed to write the target
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Record already present in the target collection
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A read against the store failed (ownership, collaborator, duplicate)
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// A write against the store failed or returned nothing
    #[error("Store error: {0}")]
    Store(String),

    /// Fetching or parsing a scrape target failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Fetch(format!("request timed out: {}", e))
        } else {
            Error::Fetch(e.to_string())
        }
    }
}
