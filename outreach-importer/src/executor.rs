use crate::batch::Batch;
use crate::policy::UpsertPolicy;
use crate::report::RunReporter;
use shared_types::{BatchResult, ImportOutcome, RecordOutcome, StoreError};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Run batches across a bounded pool of worker tasks.
///
/// At most `max_in_flight` batches run at once. Completion order across
/// batches is not deterministic; record order inside a batch is. Every
/// batch reports exactly one result to the reporter, whatever happened
/// to its records.
pub async fn execute_batches(
    batches: Vec<Batch>,
    policy: UpsertPolicy,
    reporter: Arc<RunReporter>,
    max_in_flight: usize,
) {
    let mut join_set: JoinSet<BatchResult> = JoinSet::new();
    let mut pending = batches.into_iter().peekable();

    loop {
        while join_set.len() < max_in_flight {
            if let Some(batch) = pending.next() {
                let policy = policy.clone();
                join_set.spawn(async move { process_batch(batch, policy).await });
            } else {
                break;
            }
        }

        if join_set.is_empty() && pending.peek().is_none() {
            break;
        }

        if let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(result) => reporter.record(&result),
                Err(e) => tracing::error!("batch task failed to join: {}", e),
            }
        }
    }
}

/// Process one batch's records in source order. Record-level store
/// errors mark that record failed and move on; a lost connection fails
/// the rest of the batch without touching other batches.
async fn process_batch(batch: Batch, policy: UpsertPolicy) -> BatchResult {
    let mut outcomes = Vec::with_capacity(batch.records.len());
    let mut records = batch.records.into_iter();

    while let Some(record) = records.next() {
        let row_index = record.raw_row_index;
        match policy.apply(&record).await {
            Ok(outcome) => outcomes.push(RecordOutcome { row_index, outcome }),
            Err(StoreError::ConnectionLost(reason)) => {
                tracing::error!(
                    sheet = %batch.sheet,
                    batch = batch.index,
                    "aborting batch: {}",
                    reason
                );
                outcomes.push(RecordOutcome {
                    row_index,
                    outcome: ImportOutcome::Failed(reason.clone()),
                });
                for rest in records.by_ref() {
                    outcomes.push(RecordOutcome {
                        row_index: rest.raw_row_index,
                        outcome: ImportOutcome::Failed(format!("batch aborted: {}", reason)),
                    });
                }
                break;
            }
            Err(err) => outcomes.push(RecordOutcome {
                row_index,
                outcome: ImportOutcome::Failed(err.to_string()),
            }),
        }
    }

    BatchResult {
        sheet: batch.sheet,
        batch_index: batch.index,
        outcomes,
    }
}
