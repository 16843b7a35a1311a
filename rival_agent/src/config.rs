//! Environment configuration
//!
//! Every setting is optional: a missing token or credential degrades the
//! corresponding lookup (empty metadata, empty feature list) instead of
//! failing startup.

use std::env;

/// Default repository-metadata API base
const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

/// Default LLM completion endpoint base
const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

/// Default extraction model
const DEFAULT_LLM_MODEL: &str = "gpt-4.1-mini";

/// Configuration for collection and analysis runs
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Bearer token for the metadata service; absence only means a
    /// stricter rate limit
    pub github_token: Option<String>,
    /// Metadata API base, overridable for self-hosted setups and tests
    pub github_api_base: String,
    /// Credential for the LLM service; absence disables extraction
    pub llm_api_key: Option<String>,
    /// LLM completion endpoint base
    pub llm_base_url: String,
    /// Model used for feature extraction
    pub llm_model: String,
    /// Strict operation mode toggle
    pub strict_mode: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_base: DEFAULT_GITHUB_API_BASE.to_string(),
            llm_api_key: None,
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            strict_mode: true,
        }
    }
}

impl AgentConfig {
    /// Read configuration from the environment
    ///
    /// Variables: `GITHUB_TOKEN`, `GITHUB_API_URL`, `OPENAI_API_KEY`,
    /// `RIVALKIT_LLM_BASE_URL`, `RIVALKIT_LLM_MODEL`, `STRICT_MODE`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            github_token: env_non_empty("GITHUB_TOKEN"),
            github_api_base: env_non_empty("GITHUB_API_URL").unwrap_or(defaults.github_api_base),
            llm_api_key: env_non_empty("OPENAI_API_KEY"),
            llm_base_url: env_non_empty("RIVALKIT_LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            llm_model: env_non_empty("RIVALKIT_LLM_MODEL").unwrap_or(defaults.llm_model),
            strict_mode: env_non_empty("STRICT_MODE")
                .map(|value| value.to_lowercase() == "true")
                .unwrap_or(true),
        }
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
