//! Competitor entity model
//!
//! Defines the persistent competitor record and the feature descriptions
//! the analysis stages compare. Records are created fully populated: every
//! collection field starts empty rather than absent, and both timestamps
//! default to creation time.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Market position of a competitor relative to the reference product
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitorCategory {
    /// Competes for the same users with the same kind of product
    Direct,
    /// Solves the same problem with a different kind of product
    Indirect,
    /// Could enter the market but has not yet
    Potential,
}

/// Classification of a single product feature
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureCategory {
    Core,
    Advanced,
    Integration,
}

impl Default for FeatureCategory {
    // Unclassified features are treated as non-core by the severity rule
    fn default() -> Self {
        Self::Advanced
    }
}

/// A single product feature
///
/// Features are compared by case-insensitive `name` equality only;
/// `description` and `category` never participate in matching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: FeatureCategory,
}

impl Feature {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: FeatureCategory,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category,
        }
    }
}

/// Persistent record for one competitor
///
/// The `id` is derived from the name and doubles as the filename stem in
/// the store. Records are immutable once saved except for `last_updated`,
/// which only [`CompetitorRecord::touch`] moves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRecord {
    pub id: String,
    pub name: String,
    pub category: CompetitorCategory,
    pub website: String,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub feature_list: Vec<Feature>,
    #[serde(default)]
    pub technology_stack: Vec<String>,
    #[serde(default)]
    pub pricing: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub user_reviews: Vec<serde_json::Value>,
    #[serde(default = "Utc::now")]
    pub discovered_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl CompetitorRecord {
    /// Create a record with a slug id derived from the name
    ///
    /// All collection fields start empty; both timestamps are creation time.
    pub fn new(
        name: impl Into<String>,
        category: CompetitorCategory,
        website: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: slug_id(&name),
            name,
            category,
            website: website.into(),
            repository_url: None,
            description: String::new(),
            feature_list: Vec::new(),
            technology_stack: Vec::new(),
            pricing: IndexMap::new(),
            user_reviews: Vec::new(),
            discovered_at: now,
            last_updated: now,
        }
    }

    /// Replace the technology stack, dropping empty entries and duplicates
    /// while preserving first-seen order
    pub fn set_technology_stack<I, S>(&mut self, stack: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = std::collections::HashSet::new();
        self.technology_stack = stack
            .into_iter()
            .map(Into::into)
            .filter(|entry: &String| !entry.is_empty())
            .filter(|entry| seen.insert(entry.to_lowercase()))
            .collect();
    }

    /// Move `last_updated` to now
    ///
    /// The only field a saved record is allowed to change.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

/// Derive the store id for a competitor name: lowercase, spaces to hyphens
pub fn slug_id(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// The product being evaluated against competitors
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReferenceProduct {
    pub description: String,
    pub features: Vec<Feature>,
}

impl ReferenceProduct {
    pub fn new(description: impl Into<String>, features: Vec<Feature>) -> Self {
        Self {
            description: description.into(),
            features,
        }
    }
}
