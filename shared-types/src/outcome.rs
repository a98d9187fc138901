use crate::contact::CandidateContact;
use serde::{Deserialize, Serialize};

/// Why a source row was dropped during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "reason", content = "detail")]
pub enum SkipReason {
    /// No identifying field (name, email, phone) present.
    Empty,
    /// The row could not be read or decoded.
    Malformed(String),
}

/// One extracted item: either a usable candidate or a counted skip.
#[derive(Debug, Clone)]
pub enum Extracted {
    Contact(CandidateContact),
    Skip(SkipReason),
}

/// Final classification of a record that reached the import policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "outcome", content = "detail")]
pub enum ImportOutcome {
    Created,
    Updated,
    SkippedDuplicate,
    SkippedEmpty,
    Failed(String),
}

impl ImportOutcome {
    pub fn is_imported(&self) -> bool {
        matches!(self, ImportOutcome::Created | ImportOutcome::Updated)
    }
}

/// Outcome of a single record within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// 1-based data row index in the source sheet.
    pub row_index: usize,
    pub outcome: ImportOutcome,
}

/// Result of processing one batch, reported to the run aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub sheet: String,
    /// 1-based batch index within the sheet.
    pub batch_index: usize,
    /// One entry per record, in source order.
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchResult {
    pub fn imported(&self) -> u64 {
        self.outcomes
            .iter()
            .filter(|r| r.outcome.is_imported())
            .count() as u64
    }

    pub fn total(&self) -> u64 {
        self.outcomes.len() as u64
    }
}
