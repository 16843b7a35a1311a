//! Rivalkit agent
//!
//! Service layer of the competitive-intelligence pipeline:
//! - Environment configuration
//! - Repository-metadata fetcher (hosting-provider API)
//! - LLM-backed feature extraction
//! - Batch collection and end-to-end analysis runs

// Module declarations
pub mod config;
pub mod errors;
pub mod extract;
pub mod hosting;
pub mod pipeline;

// Re-export main types
pub use config::AgentConfig;

pub use errors::{AgentError, Result};

pub use extract::{find_json_array, FeatureExtractor};

pub use hosting::{parse_repo_slug, RepoMetadata, RepoMetadataClient};

pub use pipeline::{BatchReport, CompetitorSeed, IntelPipeline};

/// Version of the agent crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
