//! End-to-end collection and analysis runs
//!
//! Orchestrates the stages over the entity store: seed collection with
//! metadata enrichment, then per-competitor extraction, gap analysis and
//! suggestion generation, and finally report assembly and persistence.
//! Competitors are processed strictly one at a time in store-iteration
//! order; a failing item is logged and skipped, never fatal to the run.

use chrono::Utc;

use rival_core::{
    analyze_features, assemble_report, generate_suggestions, render_markdown, slug_id,
    AnalysisReport, Collected, CompetitorAnalysis, CompetitorCategory, CompetitorRecord,
    CompetitorStore, ReferenceProduct, ReportStore,
};

use crate::config::AgentConfig;
use crate::errors::Result;
use crate::extract::FeatureExtractor;
use crate::hosting::RepoMetadataClient;

/// Filename stem for persisted analysis reports
const REPORT_STEM: &str = "analysis_report";

/// Manual input describing one competitor to collect
#[derive(Clone, Debug)]
pub struct CompetitorSeed {
    pub name: String,
    pub website: Option<String>,
    pub repository_url: Option<String>,
}

impl CompetitorSeed {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            website: None,
            repository_url: None,
        }
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_repository(mut self, repository_url: impl Into<String>) -> Self {
        self.repository_url = Some(repository_url.into());
        self
    }
}

/// Partial-success outcome of a collection batch
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    /// Ids of records collected and saved
    pub collected: Vec<String>,
    /// Names of seeds that failed
    pub failed: Vec<String>,
}

/// The full pipeline over one data directory
pub struct IntelPipeline {
    store: CompetitorStore,
    reports: ReportStore,
    metadata: RepoMetadataClient,
    extractor: FeatureExtractor,
}

impl IntelPipeline {
    /// Build a pipeline rooted at the given data and output directories
    ///
    /// Directory creation failure is the one aborting condition; missing
    /// credentials only degrade the corresponding stage.
    pub fn new(
        data_dir: impl Into<std::path::PathBuf>,
        output_dir: impl Into<std::path::PathBuf>,
        config: &AgentConfig,
    ) -> Result<Self> {
        let store = CompetitorStore::open(data_dir)?;
        let reports = ReportStore::open(output_dir)?;
        let metadata = RepoMetadataClient::new(config)?;
        let extractor = FeatureExtractor::new(config)?;

        tracing::info!(
            "Pipeline ready: metadata token {}, extractor {}, strict mode {}",
            if config.github_token.is_some() { "present" } else { "absent" },
            if extractor.is_configured() { "configured" } else { "unconfigured" },
            config.strict_mode
        );

        Ok(Self {
            store,
            reports,
            metadata,
            extractor,
        })
    }

    /// The underlying competitor store
    pub fn store(&self) -> &CompetitorStore {
        &self.store
    }

    /// Collect one competitor from a seed and persist the record
    pub async fn collect_one(&self, seed: &CompetitorSeed) -> Result<CompetitorRecord> {
        let website = seed.website.clone().unwrap_or_else(|| {
            format!("https://{}.com", seed.name.to_lowercase().replace(' ', ""))
        });

        let mut record =
            CompetitorRecord::new(seed.name.clone(), CompetitorCategory::Direct, website);
        record.repository_url = seed.repository_url.clone();

        if let Some(repo_url) = &seed.repository_url {
            match self.metadata.fetch(repo_url).await {
                Collected::Complete(metadata) => {
                    record.description = metadata.description.clone();
                    record.set_technology_stack(metadata.technology_stack());
                }
                Collected::Degraded { reason, .. } => {
                    tracing::warn!("Metadata degraded for {}: {}", seed.name, reason);
                }
            }
        }

        self.store.save(&record)?;
        Ok(record)
    }

    /// Collect a batch of seeds, skipping failures
    ///
    /// Each item failure is caught and logged; the batch continues and the
    /// returned report carries the partial-success split. The store summary
    /// is refreshed afterwards.
    pub async fn collect(&self, seeds: &[CompetitorSeed]) -> Result<BatchReport> {
        tracing::info!("Collecting {} competitors", seeds.len());

        let mut batch = BatchReport::default();
        for seed in seeds {
            match self.collect_one(seed).await {
                Ok(record) => batch.collected.push(record.id),
                Err(err) => {
                    tracing::warn!("Collection failed for {}: {}", seed.name, err);
                    batch.failed.push(seed.name.clone());
                }
            }
        }

        self.store.write_summary()?;
        tracing::info!(
            "Collected {} of {} competitors",
            batch.collected.len(),
            seeds.len()
        );
        Ok(batch)
    }

    /// Analyze every stored competitor against the reference product
    ///
    /// Runs extraction, gap analysis and suggestion generation per
    /// competitor in store order, assembles the aggregate report, and
    /// persists it as JSON plus a Markdown sibling. A malformed stored
    /// record propagates (store corruption); extraction failures degrade
    /// to empty feature lists.
    pub async fn analyze(&self, reference: &ReferenceProduct) -> Result<AnalysisReport> {
        let competitors = self.store.load_all()?;
        tracing::info!("Analyzing {} competitors", competitors.len());

        let analysis_date = Utc::now();
        let batch_date = analysis_date.date_naive();

        let mut analyses = Vec::with_capacity(competitors.len());
        for record in &competitors {
            tracing::info!("Analyzing competitor: {}", record.name);

            let extracted = self.extractor.extract(record).await;
            if let Some(reason) = extracted.reason() {
                tracing::warn!("Feature extraction degraded for {}: {}", record.name, reason);
            }
            let features = extracted.into_value();

            let gaps = analyze_features(&reference.features, &features, &record.name);
            let suggestions = generate_suggestions(&gaps, &record.name, batch_date);

            analyses.push(CompetitorAnalysis {
                name: record.name.clone(),
                website: record.website.clone(),
                features,
                gaps,
                suggestions,
            });
        }

        let report = assemble_report(reference, &analyses, analysis_date);
        self.reports.save(&report, REPORT_STEM)?;
        self.reports
            .save_markdown(&render_markdown(&report), REPORT_STEM)?;
        self.store.write_summary()?;

        Ok(report)
    }

    /// Load the report persisted by the last analysis run
    pub fn load_report(&self) -> Result<AnalysisReport> {
        Ok(self.reports.load(REPORT_STEM)?)
    }
}

/// Derive the record id a seed will collect under
pub fn seed_id(seed: &CompetitorSeed) -> String {
    slug_id(&seed.name)
}
