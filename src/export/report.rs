//! Run reports for export operations

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of one export run
///
/// Collections appear in the order they were processed. `aborted` is set
/// when a run-level failure stopped the export early.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// Exported database
    pub database: String,
    /// Run start time
    pub started_at: DateTime<Utc>,
    /// Run end time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Per-collection outcomes
    pub collections: Vec<CollectionOutcome>,
    /// Run-level failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

/// Outcome for a single collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionOutcome {
    pub collection: String,
    pub key: String,
    #[serde(flatten)]
    pub status: CollectionStatus,
}

/// Whether a collection's artifact was written
///
/// Serialized inline with its outcome under a `status` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CollectionStatus {
    Exported { documents: usize, bytes: usize },
    Failed { message: String },
}

impl ExportReport {
    /// Start a report for `database`, stamped with the current time
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            started_at: Utc::now(),
            finished_at: None,
            collections: Vec::new(),
            aborted: None,
        }
    }

    /// Record a collection whose artifact was uploaded
    pub fn record_exported(
        &mut self,
        collection: impl Into<String>,
        key: impl Into<String>,
        documents: usize,
        bytes: usize,
    ) {
        self.collections.push(CollectionOutcome {
            collection: collection.into(),
            key: key.into(),
            status: CollectionStatus::Exported { documents, bytes },
        });
    }

    /// Record a collection whose upload failed with the provider's message
    pub fn record_failed(
        &mut self,
        collection: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.collections.push(CollectionOutcome {
            collection: collection.into(),
            key: key.into(),
            status: CollectionStatus::Failed {
                message: message.into(),
            },
        });
    }

    /// Mark the run as stopped early
    pub fn abort(&mut self, message: impl Into<String>) {
        self.aborted = Some(message.into());
    }

    /// Stamp the end time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of collections written successfully
    pub fn exported_count(&self) -> usize {
        self.collections
            .iter()
            .filter(|o| matches!(o.status, CollectionStatus::Exported { .. }))
            .count()
    }

    /// Collections whose upload failed
    pub fn failures(&self) -> impl Iterator<Item = &CollectionOutcome> {
        self.collections
            .iter()
            .filter(|o| matches!(o.status, CollectionStatus::Failed { .. }))
    }

    /// True when the run was not aborted and every upload succeeded
    pub fn is_success(&self) -> bool {
        self.aborted.is_none() && self.failures().next().is_none()
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        let failed = self.failures().count();
        let mut line = format!(
            "{} exported, {} failed in '{}'",
            self.exported_count(),
            failed,
            self.database
        );
        if let Some(reason) = &self.aborted {
            line.push_str(&format!(" (aborted: {reason})"));
        }
        line
    }
}
