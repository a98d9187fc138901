use chrono::Utc;
use shared_types::{BatchResult, Extracted, RunSummary};
use std::sync::Mutex;
use std::time::Instant;
use uuid::Uuid;

/// Single aggregation point for a run.
///
/// Worker tasks hand their batch results here and never touch the
/// summary themselves; every counter update and every progress line goes
/// through one lock, so each batch is recorded exactly once no matter
/// how workers interleave.
pub struct RunReporter {
    run_id: Uuid,
    started: Instant,
    state: Mutex<RunSummary>,
}

impl RunReporter {
    pub fn new() -> Self {
        let run_id = Uuid::new_v4();
        Self {
            run_id,
            started: Instant::now(),
            state: Mutex::new(RunSummary::new(run_id, Utc::now().timestamp())),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Count one extracted row before batching. Skips are classified
    /// here; usable candidates only increment the rows-read counter.
    pub fn record_extracted(&self, sheet: &str, item: &Extracted) {
        let skip = match item {
            Extracted::Skip(reason) => Some(reason),
            Extracted::Contact(_) => None,
        };
        let mut state = self.state.lock().expect("run summary lock poisoned");
        state.record_extracted(sheet, skip);
    }

    /// Record one completed batch and emit its progress line.
    pub fn record(&self, result: &BatchResult) {
        let mut state = self.state.lock().expect("run summary lock poisoned");
        state.record_batch(result);
        tracing::info!(
            sheet = %result.sheet,
            batch = result.batch_index,
            "imported {}/{} records",
            result.imported(),
            result.total()
        );
    }

    /// Close the run: emit the final summary block and return the
    /// summary.
    pub fn finish(&self) -> RunSummary {
        let summary = {
            let mut state = self.state.lock().expect("run summary lock poisoned");
            state.finished_at = Some(Utc::now().timestamp());
            state.clone()
        };

        let elapsed = self.started.elapsed().as_secs_f64();
        let totals = &summary.totals;
        let rate = if elapsed > 0.0 {
            totals.processed as f64 / elapsed
        } else {
            0.0
        };

        tracing::info!(run_id = %summary.run_id, "import run complete");
        for (sheet, counters) in &summary.sheets {
            tracing::info!(
                sheet = %sheet,
                rows = counters.rows_read,
                processed = counters.processed,
                created = counters.created,
                updated = counters.updated,
                skipped_duplicate = counters.skipped_duplicate,
                skipped_empty = counters.skipped_empty,
                malformed = counters.malformed,
                errored = counters.errored,
                "sheet summary"
            );
        }
        tracing::info!(
            rows = totals.rows_read,
            processed = totals.processed,
            imported = totals.imported(),
            errors = totals.errored,
            batches = totals.batches,
            duration_secs = elapsed,
            rate_per_sec = rate,
            "run summary"
        );
        if let Ok(json) = serde_json::to_string(&summary) {
            tracing::info!("run summary json: {}", json);
        }

        summary
    }
}

impl Default for RunReporter {
    fn default() -> Self {
        Self::new()
    }
}
