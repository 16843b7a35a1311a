//! Error types for the agent layer

use thiserror::Error;

/// Main error type for collection and analysis runs
///
/// Soft failures (metadata fetch, feature extraction) never surface here;
/// they degrade in place. This covers the hard failures: store problems
/// and HTTP client construction.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Core(#[from] rival_core::IntelError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;
