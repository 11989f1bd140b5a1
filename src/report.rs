//! Report types produced by the checking pipeline.
//!
//! The serialized shape of a per-file report is fixed:
//! `{success, messages, confidence?, filename}` — `confidence` appears only
//! when a classifier actually scored the document.

use serde::{Deserialize, Serialize};

/// The outcome of checking a single document, before a filename is attached.
///
/// Produced by the rule checker and enriched by the classifier step. The
/// checker itself never knows the filename; the submission boundary attaches
/// it (see [`FileReport`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// `true` only when no rule was violated and, if a classifier ran, it
    /// labeled the document correct.
    pub success: bool,
    /// Human-readable diagnostics, in evaluation order.
    pub messages: Vec<String>,
    /// Classifier confidence as a percentage string (e.g. `"97.25%"`).
    /// `None` whenever no classifier scored the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
}

impl CheckReport {
    /// A passing report with no messages.
    pub fn passed() -> Self {
        Self {
            success: true,
            messages: Vec::new(),
            confidence: None,
        }
    }

    /// A failed report carrying a single diagnostic message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            messages: vec![message.into()],
            confidence: None,
        }
    }

    /// Attach a filename, producing the externally-visible report.
    pub fn into_file_report(self, filename: impl Into<String>) -> FileReport {
        FileReport {
            filename: filename.into(),
            report: self,
        }
    }
}

/// A [`CheckReport`] with the submitting filename attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub filename: String,
    #[serde(flatten)]
    pub report: CheckReport,
}

/// Aggregate counters for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Files submitted, including skipped and rejected entries.
    pub total_files: usize,
    /// Reports with `success == true`.
    pub passed: usize,
    /// Reports with `success == false`.
    pub failed: usize,
    /// Entries silently skipped (empty filenames).
    pub skipped: usize,
    /// Wall-clock duration of the whole submission.
    pub duration_ms: u64,
}

/// Everything a submission produces: one report per processed file plus
/// aggregate counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutput {
    pub reports: Vec<FileReport>,
    pub stats: BatchStats,
}

impl BatchOutput {
    /// `true` when every report in the submission passed.
    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(|r| r.report.success)
    }
}
