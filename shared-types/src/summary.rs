use crate::outcome::{BatchResult, ImportOutcome, SkipReason};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Counter block shared by the whole run and each sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCounters {
    /// Every data row seen by the extractor.
    pub rows_read: u64,
    /// Records that reached the import policy.
    pub processed: u64,
    pub created: u64,
    pub updated: u64,
    pub skipped_duplicate: u64,
    /// Rows dropped at extraction for having no identifying field.
    pub skipped_empty: u64,
    /// Rows dropped at extraction for being unreadable.
    pub malformed: u64,
    pub errored: u64,
    pub batches: u64,
}

impl ImportCounters {
    pub fn imported(&self) -> u64 {
        self.created + self.updated
    }

    fn record_row_read(&mut self) {
        self.rows_read += 1;
    }

    fn record_skip(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::Empty => self.skipped_empty += 1,
            SkipReason::Malformed(_) => self.malformed += 1,
        }
    }

    fn record_outcome(&mut self, outcome: &ImportOutcome) {
        match outcome {
            ImportOutcome::Created => {
                self.processed += 1;
                self.created += 1;
            }
            ImportOutcome::Updated => {
                self.processed += 1;
                self.updated += 1;
            }
            ImportOutcome::SkippedDuplicate => {
                self.processed += 1;
                self.skipped_duplicate += 1;
            }
            // Empty rows are normally dropped at extraction and never
            // reach a batch; one slipping through is a skip, not an
            // import.
            ImportOutcome::SkippedEmpty => self.skipped_empty += 1,
            ImportOutcome::Failed(_) => {
                self.processed += 1;
                self.errored += 1;
            }
        }
    }
}

/// Aggregate state of one import run. Owned by the run reporter; worker
/// tasks never touch this directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    /// Epoch seconds.
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub totals: ImportCounters,
    pub sheets: BTreeMap<String, ImportCounters>,
}

impl RunSummary {
    pub fn new(run_id: Uuid, started_at: i64) -> Self {
        Self {
            run_id,
            started_at,
            finished_at: None,
            totals: ImportCounters::default(),
            sheets: BTreeMap::new(),
        }
    }

    fn sheet_mut(&mut self, sheet: &str) -> &mut ImportCounters {
        self.sheets.entry(sheet.to_string()).or_default()
    }

    /// Count one extracted row. Skipped rows are classified here; usable
    /// candidates are only counted as read and become `processed` when
    /// their batch result arrives.
    pub fn record_extracted(&mut self, sheet: &str, skip: Option<&SkipReason>) {
        self.totals.record_row_read();
        self.sheet_mut(sheet).record_row_read();
        if let Some(reason) = skip {
            self.totals.record_skip(reason);
            self.sheet_mut(sheet).record_skip(reason);
        }
    }

    pub fn record_batch(&mut self, result: &BatchResult) {
        self.totals.batches += 1;
        self.sheet_mut(&result.sheet).batches += 1;
        for record in &result.outcomes {
            self.totals.record_outcome(&record.outcome);
            self.sheet_mut(&result.sheet).record_outcome(&record.outcome);
        }
    }

    /// Both counting identities that must hold for any finished run:
    /// policy outcomes account for every processed record, and extraction
    /// skips plus processed records account for every row read.
    pub fn is_conserved(&self) -> bool {
        let t = &self.totals;
        t.processed == t.created + t.updated + t.skipped_duplicate + t.errored
            && t.rows_read == t.processed + t.skipped_empty + t.malformed
    }
}
