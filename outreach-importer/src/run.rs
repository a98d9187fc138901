use crate::batch::{partition, validate_batch_size, validate_threads};
use crate::executor::execute_batches;
use crate::policy::{ImportMode, UpsertPolicy};
use crate::report::RunReporter;
use crate::store::ContactStore;
use extractors::{HeaderAliases, RowExtractor, TabularSource};
use shared_types::{Extracted, ImportError, RunSummary};
use std::sync::Arc;

/// Settings for one end-to-end import run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub batch_size: usize,
    pub threads: usize,
    pub mode: ImportMode,
    /// Restrict the run to one sheet; all sheets otherwise.
    pub sheet: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            batch_size: 100,
            threads: 4,
            mode: ImportMode::default(),
            sheet: None,
        }
    }
}

/// One invocation of the importer over one source.
///
/// The coordinating task extracts and partitions sequentially, hands the
/// batches to the worker pool, and blocks until every batch has reported
/// before producing the final summary.
pub struct ImportRun {
    source: Box<dyn TabularSource>,
    store: Arc<dyn ContactStore>,
    aliases: HeaderAliases,
    options: RunOptions,
}

impl ImportRun {
    pub fn new(
        source: Box<dyn TabularSource>,
        store: Arc<dyn ContactStore>,
        options: RunOptions,
    ) -> Self {
        Self {
            source,
            store,
            aliases: HeaderAliases::default(),
            options,
        }
    }

    pub fn with_aliases(mut self, aliases: HeaderAliases) -> Self {
        self.aliases = aliases;
        self
    }

    pub async fn execute(self) -> Result<RunSummary, ImportError> {
        let batch_size = validate_batch_size(self.options.batch_size)?;
        let threads = validate_threads(self.options.threads)?;

        let available = self.source.list_sheets();
        let selected: Vec<String> = match &self.options.sheet {
            Some(name) => {
                if !available.iter().any(|sheet| sheet == name) {
                    return Err(ImportError::SheetNotFound(name.clone()));
                }
                vec![name.clone()]
            }
            None => available,
        };

        let reporter = Arc::new(RunReporter::new());
        tracing::info!(
            run_id = %reporter.run_id(),
            sheets = selected.len(),
            batch_size,
            threads,
            dry_run = self.options.mode.dry_run,
            "starting import run"
        );

        let extractor = RowExtractor::new(self.aliases.clone());
        let mut batches = Vec::new();
        for sheet in &selected {
            let mut candidates = Vec::new();
            for (_, item) in extractor.extract_sheet(self.source.as_ref(), sheet)? {
                reporter.record_extracted(sheet, &item);
                if let Extracted::Contact(candidate) = item {
                    candidates.push(candidate);
                }
            }
            batches.extend(partition(sheet, candidates, batch_size));
        }

        let policy = UpsertPolicy::new(self.store.clone(), self.options.mode);
        execute_batches(batches, policy, reporter.clone(), threads).await;

        Ok(reporter.finish())
    }
}
