//! Feature gap detection
//!
//! Compares the reference feature set against one competitor's feature list
//! and tags each competitor feature with a severity. Pure computation: no
//! I/O, deterministic for a given input.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::competitor::{Feature, FeatureCategory};

/// Urgency of a feature gap
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSeverity {
    Low,
    Medium,
    High,
    /// Reserved for gaps the reference product treats as mandatory.
    /// The severity rule in [`analyze_features`] never assigns it.
    Critical,
}

/// A feature present in a competitor, tagged against the reference set
///
/// Derived per analysis run and aggregated into the report; never persisted
/// on its own. Gaps are emitted for existing features too (severity low) so
/// callers can filter as needed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGap {
    pub feature_name: String,
    pub description: String,
    pub exists_in_reference: bool,
    pub source_competitor_name: String,
    pub severity: GapSeverity,
}

/// Compare a competitor's features against the reference feature set
///
/// Existence is decided by case-insensitive name membership. Severity:
/// a feature missing from the reference set is `High` when the competitor
/// classifies it core and `Medium` otherwise; a feature the reference
/// already has is `Low`. One gap per competitor feature, in input order.
pub fn analyze_features(
    reference: &[Feature],
    competitor_features: &[Feature],
    competitor_name: &str,
) -> Vec<FeatureGap> {
    let reference_names: HashSet<String> =
        reference.iter().map(|f| f.name.to_lowercase()).collect();

    let gaps: Vec<FeatureGap> = competitor_features
        .iter()
        .map(|feature| {
            let exists = reference_names.contains(&feature.name.to_lowercase());
            let severity = if !exists {
                if feature.category == FeatureCategory::Core {
                    GapSeverity::High
                } else {
                    GapSeverity::Medium
                }
            } else {
                GapSeverity::Low
            };

            FeatureGap {
                feature_name: feature.name.clone(),
                description: feature.description.clone(),
                exists_in_reference: exists,
                source_competitor_name: competitor_name.to_string(),
                severity,
            }
        })
        .collect();

    let missing = gaps.iter().filter(|g| !g.exists_in_reference).count();
    tracing::debug!(
        "Compared {} features from {}: {} missing from reference",
        gaps.len(),
        competitor_name,
        missing
    );

    gaps
}
