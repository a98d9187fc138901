use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

use extractors::CsvSource;
use outreach_importer::config::ImporterConfig;
use outreach_importer::policy::ImportMode;
use outreach_importer::run::{ImportRun, RunOptions};
use outreach_importer::store::{ContactStore, MemoryContactStore, RestContactStore};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source file (.csv) or directory of .csv sheets
    source: PathBuf,

    /// Records per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Concurrent batches in flight (1-16)
    #[arg(long)]
    threads: Option<usize>,

    /// Merge non-empty incoming fields into matching contacts
    #[arg(long)]
    update_existing: bool,

    /// Never touch contacts that already exist
    #[arg(long)]
    import_only_new: bool,

    /// Import a single sheet instead of all sheets
    #[arg(long)]
    sheet: Option<String>,

    /// Compute outcomes without writing to the store
    #[arg(long)]
    dry_run: bool,

    /// Contact store backend
    #[arg(long, value_enum, default_value = "rest")]
    store: StoreBackend,

    /// Config file path (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for per-run log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum StoreBackend {
    Rest,
    Memory,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (config, config_path) = ImporterConfig::load(args.config.clone())
        .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;

    let log_dir = args
        .log_dir
        .clone()
        .or_else(|| config.log_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&log_dir)?;
    let log_name = format!(
        "import-run-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    );

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_writer(std::io::stdout),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    tracing::info!(config = %config_path.display(), "run log: {}", log_dir.join(&log_name).display());

    let store: Arc<dyn ContactStore> = match args.store {
        StoreBackend::Memory => Arc::new(MemoryContactStore::new()),
        StoreBackend::Rest => {
            let store_config = config.store.clone().ok_or_else(|| {
                anyhow::anyhow!(
                    "no [store] section in {}; pass --store memory for a local run",
                    config_path.display()
                )
            })?;
            Arc::new(RestContactStore::new(&store_config))
        }
    };

    let source = CsvSource::open(&args.source)?;

    let defaults = config.import.clone().unwrap_or_default();
    let options = RunOptions {
        batch_size: args
            .batch_size
            .or(defaults.batch_size)
            .unwrap_or(100),
        threads: args.threads.or(defaults.threads).unwrap_or(4),
        mode: ImportMode {
            update_existing: args.update_existing,
            import_only_new: args.import_only_new,
            dry_run: args.dry_run,
        },
        sheet: args.sheet.clone(),
    };

    let summary = ImportRun::new(Box::new(source), store, options)
        .with_aliases(config.aliases())
        .execute()
        .await?;

    // Individual record failures are reported, not fatal; the process
    // only exits non-zero when the run itself could not start.
    if summary.totals.errored > 0 {
        tracing::warn!(errors = summary.totals.errored, "run finished with record errors");
    }

    Ok(())
}
