use thiserror::Error;

use crate::types::AppId;

/// Classifies pattern store errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Backing file could not be read or written
    Io,
    /// Backing file exists but its contents are not valid pattern rows
    Corrupt,
    /// Stored rows violate the uniqueness invariant
    Duplicate,
}

/// Router error types
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("No URL found")]
    NoUrlFound,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("App '{identifier}' is not installed: {message}")]
    AppNotFound {
        app: AppId,
        identifier: String,
        message: String,
    },

    #[error("Pattern already exists: {0}")]
    AlreadyExists(String),

    #[error("Pattern is empty")]
    EmptyPattern,

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Store error: {message}")]
    StoreError {
        kind: StoreErrorKind,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, RouterError>;
