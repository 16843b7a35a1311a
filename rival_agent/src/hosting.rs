//! Repository-metadata fetcher
//!
//! Pulls technology-stack facts for a competitor from its hosting-provider
//! repository. Every failure path (unrecognized URL, timeout, non-success
//! status, unparseable body) collapses to a degraded empty result; the
//! fetcher never propagates an error to the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use rival_core::Collected;

use crate::config::AgentConfig;
use crate::errors::Result;

/// Timeout for metadata requests
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Hosting-provider URL prefix the fetcher understands
const REPO_URL_PREFIX: &str = "https://github.com/";

/// Normalized repository facts
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    pub description: String,
    pub language: String,
    pub topics: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub homepage: String,
    /// Documentation-page reference from the best-effort readme lookup
    pub readme_url: Option<String>,
}

impl RepoMetadata {
    /// Technology-stack facts: primary language plus topic tags,
    /// empty entries excluded
    pub fn technology_stack(&self) -> Vec<String> {
        std::iter::once(self.language.clone())
            .chain(self.topics.iter().cloned())
            .filter(|entry| !entry.is_empty())
            .collect()
    }
}

/// Repository metadata wire format
#[derive(Debug, Deserialize)]
struct RepoResponse {
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    watchers_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
}

/// Readme lookup wire format
#[derive(Debug, Deserialize)]
struct ReadmeResponse {
    #[serde(default)]
    html_url: Option<String>,
}

/// Client for the repository-metadata service
#[derive(Debug, Clone)]
pub struct RepoMetadataClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl RepoMetadataClient {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_base: config.github_api_base.trim_end_matches('/').to_string(),
            token: config.github_token.clone(),
        })
    }

    /// Fetch metadata for a repository URL
    ///
    /// Soft-fails into `Collected::Degraded` with empty metadata; the
    /// readme follow-up is best-effort and its failure never degrades an
    /// otherwise successful fetch.
    pub async fn fetch(&self, repo_url: &str) -> Collected<RepoMetadata> {
        let Some((owner, repo)) = parse_repo_slug(repo_url) else {
            tracing::warn!("Unrecognized repository url: {}", repo_url);
            return Collected::degraded_empty(format!("unrecognized repository url: {repo_url}"));
        };

        let url = format!("{}/repos/{}/{}", self.api_base, owner, repo);
        let response = match self.get(&url).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("Metadata fetch failed for {}/{}: {}", owner, repo, err);
                return Collected::degraded_empty(format!("metadata request failed: {err}"));
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Metadata endpoint returned {} for {}/{}", status, owner, repo);
            return Collected::degraded_empty(format!("metadata endpoint returned {status}"));
        }

        let repo_data: RepoResponse = match response.json().await {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!("Malformed metadata response for {}/{}: {}", owner, repo, err);
                return Collected::degraded_empty(format!("malformed metadata response: {err}"));
            }
        };

        let mut metadata = RepoMetadata {
            stars: repo_data.stargazers_count,
            forks: repo_data.forks_count,
            watchers: repo_data.watchers_count,
            open_issues: repo_data.open_issues_count,
            description: repo_data.description.unwrap_or_default(),
            language: repo_data.language.unwrap_or_default(),
            topics: repo_data.topics,
            created_at: repo_data.created_at.unwrap_or_default(),
            updated_at: repo_data.updated_at.unwrap_or_default(),
            homepage: repo_data.homepage.unwrap_or_default(),
            readme_url: None,
        };
        metadata.readme_url = self.fetch_readme_url(&owner, &repo).await;

        tracing::debug!(
            "Fetched metadata for {}/{}: {} stars, language {:?}",
            owner,
            repo,
            metadata.stars,
            metadata.language
        );
        Collected::Complete(metadata)
    }

    /// Best-effort documentation-page lookup
    async fn fetch_readme_url(&self, owner: &str, repo: &str) -> Option<String> {
        let url = format!("{}/repos/{}/{}/readme", self.api_base, owner, repo);
        match self.get(&url).await {
            Ok(response) if response.status().is_success() => response
                .json::<ReadmeResponse>()
                .await
                .ok()
                .and_then(|readme| readme.html_url),
            Ok(response) => {
                tracing::debug!(
                    "Readme lookup returned {} for {}/{}",
                    response.status(),
                    owner,
                    repo
                );
                None
            }
            Err(err) => {
                tracing::debug!("Readme lookup failed for {}/{}: {}", owner, repo, err);
                None
            }
        }
    }

    async fn get(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request.send().await
    }
}

/// Extract `(owner, name)` from a hosting-provider repository URL
///
/// Returns `None` for anything that does not match the fixed
/// `https://github.com/<owner>/<name>` pattern; a trailing `.git` is
/// tolerated.
pub fn parse_repo_slug(repo_url: &str) -> Option<(String, String)> {
    let rest = repo_url.strip_prefix(REPO_URL_PREFIX)?;
    let mut parts = rest.split('/');
    let owner = parts.next().filter(|part| !part.is_empty())?;
    let repo = parts
        .next()
        .map(|part| part.trim_end_matches(".git"))
        .filter(|part| !part.is_empty())?;
    Some((owner.to_string(), repo.to_string()))
}
