//! LLM-backed feature extraction
//!
//! Turns a competitor's free-text description into a structured feature
//! list. This is the only stage that depends on a non-deterministic
//! external service, and every downstream stage tolerates its empty
//! fallback. A record that already carries features is returned as-is
//! with no network call.
//!
//! The response contract is a JSON array embedded in free text; locating
//! and parsing it is isolated in [`find_json_array`] / `parse_feature_list`
//! so the fragile boundary stays unit-testable on its own.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use rival_core::{Collected, CompetitorRecord, Feature};

use crate::config::AgentConfig;
use crate::errors::Result;

/// Request timeout for completion calls
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Fixed system role for extraction requests
const SYSTEM_ROLE: &str = "You are a professional product analyst, skilled at \
    dissecting competitor features and proposing product iterations.";

/// Low-but-nonzero sampling for mild phrasing variety
const EXTRACTION_TEMPERATURE: f64 = 0.7;

/// Output size bound for completion calls
const MAX_COMPLETION_TOKENS: u32 = 4000;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Feature extractor over a chat-completion backend
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl FeatureExtractor {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(COMPLETION_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
        })
    }

    /// True when a backend credential is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Extract the feature list for a competitor record
    ///
    /// Idempotent for records that already carry features. Extraction
    /// failures of any kind degrade to an empty list; they never reach
    /// the caller as errors.
    pub async fn extract(&self, record: &CompetitorRecord) -> Collected<Vec<Feature>> {
        if !record.feature_list.is_empty() {
            return Collected::Complete(record.feature_list.clone());
        }

        let Some(api_key) = &self.api_key else {
            tracing::warn!(
                "Feature extraction skipped for {}: no backend credential",
                record.name
            );
            return Collected::degraded_empty("extractor not configured");
        };

        if record.description.is_empty() {
            // Nothing to extract from; a valid, empty outcome
            return Collected::Complete(Vec::new());
        }

        let prompt = build_extraction_prompt(record);
        let reply = match self.complete(api_key, &prompt).await {
            Ok(reply) => reply,
            Err(reason) => {
                tracing::warn!("Feature extraction failed for {}: {}", record.name, reason);
                return Collected::degraded_empty(reason);
            }
        };

        match parse_feature_list(&reply) {
            Some(features) => {
                tracing::debug!(
                    "Extracted {} features for {}",
                    features.len(),
                    record.name
                );
                Collected::Complete(features)
            }
            None => {
                tracing::warn!(
                    "No feature array found in model response for {}",
                    record.name
                );
                Collected::degraded_empty("no feature array in model response")
            }
        }
    }

    /// One chat-completion round trip; errors are returned as reason strings
    /// because every caller degrades on them
    async fn complete(&self, api_key: &str, prompt: &str) -> std::result::Result<String, String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_ROLE,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: EXTRACTION_TEMPERATURE,
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| format!("completion request failed: {err}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("completion endpoint returned {status}"));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| format!("malformed completion response: {err}"))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| "completion response carried no choices".to_string())
    }
}

/// Build the natural-language extraction prompt for a record
fn build_extraction_prompt(record: &CompetitorRecord) -> String {
    format!(
        "Analyze the following product description and extract its core feature set.\n\
         \n\
         Product name: {}\n\
         Product description: {}\n\
         Technology stack: {}\n\
         \n\
         Return the feature list as a JSON array where every entry has:\n\
         - name: feature name\n\
         - description: feature description\n\
         - category: feature classification (core/advanced/integration)\n\
         \n\
         Example format:\n\
         [\n\
           {{\"name\": \"AI code review\", \"description\": \"Automated AI review of code quality\", \"category\": \"core\"}},\n\
           {{\"name\": \"Auto-fix suggestions\", \"description\": \"Suggests fixes for findings\", \"category\": \"advanced\"}}\n\
         ]\n",
        record.name,
        record.description,
        record.technology_stack.join(", ")
    )
}

/// Locate the first bracket-delimited array substring in free text
///
/// Spans from the first `[` to the last `]`, mirroring a greedy
/// dot-matches-newline scan. Returns `None` when no such span exists.
pub fn find_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse the feature array out of a free-text model reply
fn parse_feature_list(reply: &str) -> Option<Vec<Feature>> {
    let span = find_json_array(reply)?;
    serde_json::from_str(span).ok()
}
