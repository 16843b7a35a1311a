//! File-backed entity store
//!
//! One pretty-printed JSON file per competitor record under the data
//! directory, with the record id as the filename stem. The `summary` stem
//! is reserved for the store-wide rollup and never listed as a record.
//!
//! Single-writer, single-process usage is assumed: concurrent runs against
//! the same directory may race on file writes. That is an operational
//! constraint, not something the store synchronizes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::competitor::CompetitorRecord;
use crate::errors::{Result, StoreError};
use crate::report::AnalysisReport;

/// Filename stem reserved for the aggregate summary
const SUMMARY_STEM: &str = "summary";

/// Store for competitor records in a data directory
#[derive(Debug)]
pub struct CompetitorStore {
    data_dir: PathBuf,
}

impl CompetitorStore {
    /// Open a store, creating the data directory if needed
    ///
    /// Failure to create or read the directory is the one run-aborting
    /// store condition.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|source| StoreError::DirUnavailable {
            path: data_dir.display().to_string(),
            source,
        })?;
        Ok(Self { data_dir })
    }

    /// The directory this store reads and writes
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Write a record to `<data_dir>/<id>.json`, overwriting any prior version
    pub fn save(&self, record: &CompetitorRecord) -> Result<PathBuf> {
        let path = self.record_path(&record.id);
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json).map_err(StoreError::Io)?;
        tracing::debug!("Saved competitor {} to {}", record.id, path.display());
        Ok(path)
    }

    /// Load a record by id
    ///
    /// A missing file is `StoreError::NotFound`; a file that exists but
    /// cannot be parsed is `StoreError::Malformed` and must reach the
    /// caller, since it indicates store corruption.
    pub fn load(&self, id: &str) -> Result<CompetitorRecord> {
        let path = self.record_path(id);
        let json = fs::read_to_string(&path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                StoreError::NotFound(id.to_string())
            } else {
                StoreError::Io(err)
            }
        })?;
        let record = serde_json::from_str(&json).map_err(|source| StoreError::Malformed {
            id: id.to_string(),
            source,
        })?;
        Ok(record)
    }

    /// List every persisted record id, sorted, excluding the reserved summary
    pub fn list_ids(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.data_dir).map_err(|source| StoreError::DirUnavailable {
            path: self.data_dir.display().to_string(),
            source,
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(StoreError::Io)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if stem != SUMMARY_STEM {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Load every record, in `list_ids` order
    pub fn load_all(&self) -> Result<Vec<CompetitorRecord>> {
        self.list_ids()?
            .iter()
            .map(|id| self.load(id))
            .collect()
    }

    /// Write the reserved `summary.json` rollup across all records
    pub fn write_summary(&self) -> Result<PathBuf> {
        let records = self.load_all()?;
        let summary = StoreSummary {
            total_competitors: records.len(),
            competitors: records
                .iter()
                .map(|record| SummaryEntry {
                    id: record.id.clone(),
                    name: record.name.clone(),
                    category: record.category,
                    website: record.website.clone(),
                    feature_count: record.feature_list.len(),
                    technology_stack: record.technology_stack.clone(),
                    last_updated: record.last_updated,
                })
                .collect(),
            generated_at: Utc::now(),
        };

        let path = self.record_path(SUMMARY_STEM);
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(&path, json).map_err(StoreError::Io)?;
        tracing::debug!(
            "Wrote summary of {} competitors to {}",
            summary.total_competitors,
            path.display()
        );
        Ok(path)
    }

    fn record_path(&self, stem: &str) -> PathBuf {
        self.data_dir.join(format!("{stem}.json"))
    }
}

/// Aggregate rollup persisted as `summary.json`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreSummary {
    pub total_competitors: usize,
    pub competitors: Vec<SummaryEntry>,
    pub generated_at: DateTime<Utc>,
}

/// One record's entry in the store summary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub id: String,
    pub name: String,
    pub category: crate::competitor::CompetitorCategory,
    pub website: String,
    pub feature_count: usize,
    pub technology_stack: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

/// Store for analysis report artifacts in an output directory
#[derive(Debug)]
pub struct ReportStore {
    output_dir: PathBuf,
}

impl ReportStore {
    /// Open a report store, creating the output directory if needed
    pub fn open(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| StoreError::DirUnavailable {
            path: output_dir.display().to_string(),
            source,
        })?;
        Ok(Self { output_dir })
    }

    /// Persist a report as `<stem>.json`
    pub fn save(&self, report: &AnalysisReport, stem: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{stem}.json"));
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, json).map_err(StoreError::Io)?;
        tracing::info!("Report saved to {}", path.display());
        Ok(path)
    }

    /// Persist the Markdown rendering as `<stem>.md`
    pub fn save_markdown(&self, markdown: &str, stem: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{stem}.md"));
        fs::write(&path, markdown).map_err(StoreError::Io)?;
        tracing::info!("Markdown report saved to {}", path.display());
        Ok(path)
    }

    /// Load a previously persisted report
    ///
    /// Same not-found/malformed split as record loading.
    pub fn load(&self, stem: &str) -> Result<AnalysisReport> {
        let path = self.output_dir.join(format!("{stem}.json"));
        let json = fs::read_to_string(&path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                StoreError::NotFound(stem.to_string())
            } else {
                StoreError::Io(err)
            }
        })?;
        let report = serde_json::from_str(&json).map_err(|source| StoreError::Malformed {
            id: stem.to_string(),
            source,
        })?;
        Ok(report)
    }
}
