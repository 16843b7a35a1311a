//! Error types for the intelligence pipeline

use thiserror::Error;

/// Main error type for pipeline operations
#[derive(Error, Debug)]
pub enum IntelError {
    /// Store-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid caller-supplied input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Store-specific errors
///
/// `NotFound` and `Malformed` are deliberately distinct: a missing record is
/// a normal lookup miss, a malformed record means the data directory is
/// corrupt and the condition must reach the caller.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Malformed record {id}: {source}")]
    Malformed {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Data directory unavailable at {path}: {source}")]
    DirUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, IntelError>;
