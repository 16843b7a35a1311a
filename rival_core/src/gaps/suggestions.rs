//! Iteration suggestion generation
//!
//! Converts high-severity feature gaps into fully-specified improvement
//! suggestions. Selection is positional, not quality-ranked: the first ten
//! qualifying gaps in analyzer order cap the suggestion volume for one
//! competitor.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::analyzer::{FeatureGap, GapSeverity};

/// Cap on suggestions generated per competitor batch
const MAX_SUGGESTIONS_PER_COMPETITOR: usize = 10;

/// Expected impact of implementing a suggestion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        write!(f, "{label}")
    }
}

/// Expected effort to implement a suggestion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffortLevel {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for EffortLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        write!(f, "{label}")
    }
}

/// Lifecycle state of a suggestion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Accepted,
    Rejected,
    Done,
}

/// An actionable, prioritized improvement recommendation
///
/// Created only by [`generate_suggestions`]; immutable within a run.
/// `priority` is 1-5 with 5 highest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IterationSuggestion {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source_competitor: String,
    pub source_feature: String,
    pub priority: u8,
    pub impact: ImpactLevel,
    pub effort: EffortLevel,
    pub implementation_steps: Vec<String>,
    pub estimated_time: String,
    pub required_resources: Vec<String>,
    pub risks: Vec<String>,
    pub user_benefit: String,
    pub business_value: String,
    pub competitive_advantage: String,
    pub status: SuggestionStatus,
    pub created_at: DateTime<Utc>,
}

/// Generate suggestions for one competitor's gap list
///
/// Only gaps that are missing from the reference AND critical/high severity
/// qualify; the first ten in gap order survive. Ids are `sugg-<YYYYMMDD>-<NNN>`
/// with the sequence restarting at 1 for every batch, scoped to `batch_date`.
pub fn generate_suggestions(
    gaps: &[FeatureGap],
    competitor_name: &str,
    batch_date: NaiveDate,
) -> Vec<IterationSuggestion> {
    let date_stamp = batch_date.format("%Y%m%d");

    let suggestions: Vec<IterationSuggestion> = gaps
        .iter()
        .filter(|gap| {
            !gap.exists_in_reference
                && matches!(gap.severity, GapSeverity::Critical | GapSeverity::High)
        })
        .take(MAX_SUGGESTIONS_PER_COMPETITOR)
        .enumerate()
        .map(|(index, gap)| {
            let priority = match gap.severity {
                GapSeverity::Critical => 5,
                GapSeverity::High => 4,
                _ => 3,
            };
            let impact = match gap.severity {
                GapSeverity::Critical | GapSeverity::High => ImpactLevel::High,
                _ => ImpactLevel::Medium,
            };

            IterationSuggestion {
                id: format!("sugg-{}-{:03}", date_stamp, index + 1),
                title: format!("Implement {}", gap.feature_name),
                description: format!(
                    "Implement {}, as offered by {}. {}",
                    gap.feature_name, competitor_name, gap.description
                ),
                source_competitor: competitor_name.to_string(),
                source_feature: gap.feature_name.clone(),
                priority,
                impact,
                effort: EffortLevel::Medium,
                implementation_steps: vec![
                    format!(
                        "1. Study how {} implements {}",
                        competitor_name, gap.feature_name
                    ),
                    "2. Design our own implementation approach".to_string(),
                    "3. Build the core functionality".to_string(),
                    "4. Write test coverage".to_string(),
                    "5. Write documentation and a user guide".to_string(),
                ],
                estimated_time: "2-4 weeks".to_string(),
                required_resources: vec![
                    "1 backend engineer".to_string(),
                    "1 QA engineer".to_string(),
                ],
                risks: vec![
                    "Implementation complexity may exceed the estimate".to_string(),
                    "May require additional third-party services".to_string(),
                ],
                user_benefit: format!(
                    "Users gain access to {}, improving the product experience",
                    gap.feature_name
                ),
                business_value: "Strengthens product competitiveness and attracts more users"
                    .to_string(),
                competitive_advantage: format!(
                    "Narrows the feature gap with {}",
                    competitor_name
                ),
                status: SuggestionStatus::Pending,
                created_at: Utc::now(),
            }
        })
        .collect();

    tracing::debug!(
        "Generated {} suggestions for {}",
        suggestions.len(),
        competitor_name
    );

    suggestions
}
