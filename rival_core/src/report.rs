//! Analysis report assembly and rendering
//!
//! Aggregates gaps and suggestions across all analyzed competitors into a
//! single immutable report artifact, plus a Markdown rendering of the same
//! data. The persisted suggestion list is capped at the top 20 by priority,
//! but every aggregate count covers the full untruncated per-run data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::competitor::{Feature, ReferenceProduct};
use crate::gaps::{FeatureGap, IterationSuggestion};

/// Suggestions retained in the persisted report
const MAX_REPORT_SUGGESTIONS: usize = 20;

/// Suggestions rendered in the Markdown high-priority section
const MAX_RENDERED_SUGGESTIONS: usize = 10;

/// Priority at and above which a suggestion counts as high priority
const HIGH_PRIORITY_THRESHOLD: u8 = 4;

/// Reference-product facts recorded in the report
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSummary {
    pub description: String,
    pub feature_count: usize,
}

/// Per-competitor rollup recorded in the report
///
/// `gap_count` counts features missing from the reference, not every
/// emitted gap entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorAnalysisSummary {
    pub name: String,
    pub website: String,
    pub feature_count: usize,
    pub gap_count: usize,
    pub suggestion_count: usize,
}

/// Aggregate report for one analysis run
///
/// Assembled fresh per run and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_date: DateTime<Utc>,
    pub reference_product: ReferenceSummary,
    pub competitors_analyzed: usize,
    pub competitor_summaries: Vec<CompetitorAnalysisSummary>,
    pub total_gaps: usize,
    pub total_suggestions: usize,
    pub high_priority_suggestions: usize,
    pub suggestions: Vec<IterationSuggestion>,
}

/// One competitor's full per-run analysis output, in processing order
#[derive(Clone, Debug)]
pub struct CompetitorAnalysis {
    pub name: String,
    pub website: String,
    pub features: Vec<Feature>,
    pub gaps: Vec<FeatureGap>,
    pub suggestions: Vec<IterationSuggestion>,
}

/// Assemble the aggregate report for a run
///
/// Suggestions are sorted by priority descending with a stable sort, so
/// ties keep competitor processing order. Aggregate counts are computed
/// over the full lists before the top-20 truncation.
pub fn assemble_report(
    reference: &ReferenceProduct,
    analyses: &[CompetitorAnalysis],
    analysis_date: DateTime<Utc>,
) -> AnalysisReport {
    let competitor_summaries: Vec<CompetitorAnalysisSummary> = analyses
        .iter()
        .map(|analysis| CompetitorAnalysisSummary {
            name: analysis.name.clone(),
            website: analysis.website.clone(),
            feature_count: analysis.features.len(),
            gap_count: analysis
                .gaps
                .iter()
                .filter(|g| !g.exists_in_reference)
                .count(),
            suggestion_count: analysis.suggestions.len(),
        })
        .collect();

    let total_gaps = analyses
        .iter()
        .flat_map(|a| a.gaps.iter())
        .filter(|g| !g.exists_in_reference)
        .count();

    let mut all_suggestions: Vec<IterationSuggestion> = analyses
        .iter()
        .flat_map(|a| a.suggestions.iter().cloned())
        .collect();
    let total_suggestions = all_suggestions.len();
    let high_priority_suggestions = all_suggestions
        .iter()
        .filter(|s| s.priority >= HIGH_PRIORITY_THRESHOLD)
        .count();

    // Stable: equal priorities keep competitor processing order
    all_suggestions.sort_by(|a, b| b.priority.cmp(&a.priority));
    all_suggestions.truncate(MAX_REPORT_SUGGESTIONS);

    tracing::info!(
        "Assembled report: {} competitors, {} gaps, {} suggestions ({} high priority)",
        analyses.len(),
        total_gaps,
        total_suggestions,
        high_priority_suggestions
    );

    AnalysisReport {
        analysis_date,
        reference_product: ReferenceSummary {
            description: reference.description.clone(),
            feature_count: reference.features.len(),
        },
        competitors_analyzed: analyses.len(),
        competitor_summaries,
        total_gaps,
        total_suggestions,
        high_priority_suggestions,
        suggestions: all_suggestions,
    }
}

/// Render the prose (Markdown) form of a report
pub fn render_markdown(report: &AnalysisReport) -> String {
    let mut md = String::new();

    md.push_str("# Competitive Analysis Report\n\n");
    md.push_str(&format!(
        "**Analysis date**: {}\n\n",
        report.analysis_date.to_rfc3339()
    ));

    md.push_str("## Executive Summary\n\n");
    md.push_str(&format!(
        "This run analyzed **{}** competitors, found **{}** feature gaps and produced \
         **{}** iteration suggestions, **{}** of them high priority.\n\n",
        report.competitors_analyzed,
        report.total_gaps,
        report.total_suggestions,
        report.high_priority_suggestions
    ));

    md.push_str("## Reference Product\n\n");
    md.push_str(&format!(
        "**Description**: {}\n\n",
        report.reference_product.description
    ));
    md.push_str(&format!(
        "**Existing features**: {}\n\n",
        report.reference_product.feature_count
    ));

    md.push_str("## Competitor Overview\n\n");
    for summary in &report.competitor_summaries {
        md.push_str(&format!("### {}\n\n", summary.name));
        md.push_str(&format!("- **Website**: {}\n", summary.website));
        md.push_str(&format!("- **Features**: {}\n", summary.feature_count));
        md.push_str(&format!("- **Feature gaps**: {}\n", summary.gap_count));
        md.push_str(&format!(
            "- **Suggestions**: {}\n\n",
            summary.suggestion_count
        ));
    }

    md.push_str("## Iteration Suggestions\n\n### High Priority\n\n");
    let high_priority = report
        .suggestions
        .iter()
        .filter(|s| s.priority >= HIGH_PRIORITY_THRESHOLD)
        .take(MAX_RENDERED_SUGGESTIONS);
    for (index, suggestion) in high_priority.enumerate() {
        md.push_str(&format!("#### {}. {}\n\n", index + 1, suggestion.title));
        md.push_str(&format!(
            "**Source**: {} - {}  \n",
            suggestion.source_competitor, suggestion.source_feature
        ));
        md.push_str(&format!(
            "**Priority**: {}/5 | **Impact**: {} | **Effort**: {}\n\n",
            suggestion.priority, suggestion.impact, suggestion.effort
        ));
        md.push_str(&format!("**Description**: {}\n\n", suggestion.description));
        md.push_str(&format!("**User benefit**: {}\n\n", suggestion.user_benefit));
        md.push_str("**Implementation steps**:\n");
        for step in &suggestion.implementation_steps {
            md.push_str(&format!("{step}\n"));
        }
        md.push_str(&format!(
            "\n**Estimated time**: {}\n\n",
            suggestion.estimated_time
        ));
        md.push_str(&format!(
            "**Required resources**: {}\n\n",
            suggestion.required_resources.join(", ")
        ));
        md.push_str(&format!("**Risks**: {}\n\n---\n\n", suggestion.risks.join(", ")));
    }

    md.push_str(
        "## Summary\n\nThis analysis identified the key feature gaps and improvement \
         opportunities. Implementing the high-priority suggestions first closes the gaps \
         with competitors fastest and strengthens the product's position.\n",
    );

    md
}
