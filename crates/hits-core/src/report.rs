//! Outcome of an export run

use crate::Error;
use hits_case::EntityId;
use hits_fs::NormalizedPath;
use serde::{Serialize, Serializer};

/// Aggregate status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportOutcome {
    /// Every hit of every set was exported
    Success,
    /// At least one hit or set failed; everything else was still exported
    PartialFailure,
}

impl std::fmt::Display for ExportOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::PartialFailure => f.write_str("partial failure"),
        }
    }
}

/// What was exported for one rule-set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetReport {
    pub name: String,
    pub description: String,
    pub folder: NormalizedPath,
    /// `None` when the set folder could not be created
    pub manifest_path: Option<NormalizedPath>,
    /// Hits grouped under this set
    pub hits: usize,
    /// Hits exported without error
    pub exported: usize,
    /// Manifest entries written
    pub entries: usize,
}

/// A hit, or a whole set when `file_id` is `None`, that failed to export
#[derive(Debug, Serialize)]
pub struct HitFailure {
    pub set: String,
    pub file_id: Option<EntityId>,
    pub artifact_id: Option<u64>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Error,
}

fn serialize_error<S: Serializer>(error: &Error, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Summary of a whole run
#[derive(Debug, Serialize)]
pub struct ExportReport {
    pub output_root: NormalizedPath,
    pub outcome: ExportOutcome,
    pub sets: Vec<SetReport>,
    pub failures: Vec<HitFailure>,
    /// Artifact ids of hit records skipped for lacking a set name
    pub skipped_records: Vec<u64>,
}

impl ExportReport {
    pub(crate) fn new(
        output_root: NormalizedPath,
        sets: Vec<SetReport>,
        failures: Vec<HitFailure>,
        skipped_records: Vec<u64>,
    ) -> Self {
        let outcome = if failures.is_empty() {
            ExportOutcome::Success
        } else {
            ExportOutcome::PartialFailure
        };
        Self {
            output_root,
            outcome,
            sets,
            failures,
            skipped_records,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == ExportOutcome::Success
    }

    /// Total manifest entries across all sets
    pub fn total_entries(&self) -> usize {
        self.sets.iter().map(|set| set.entries).sum()
    }
}
