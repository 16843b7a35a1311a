//! Feature gap analysis and suggestion generation
//!
//! The two middle stages of the pipeline: comparing a competitor's feature
//! list against the reference set, and turning the resulting high-severity
//! gaps into prioritized iteration suggestions.

pub mod analyzer;
pub mod suggestions;

pub use analyzer::{analyze_features, FeatureGap, GapSeverity};
pub use suggestions::{
    generate_suggestions, EffortLevel, ImpactLevel, IterationSuggestion, SuggestionStatus,
};
