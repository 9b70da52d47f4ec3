//! Catalog Search Indexer Main Entry Point
//!
//! Runs sync jobs from standard input, or a single sync action given on the command line.

use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_search_indexer::jobs::{JobExecutor, LineJobSource, SyncJob};
use catalog_search_indexer::orchestrator::Orchestrator;
use catalog_search_indexer::{Dependencies, IndexerConfig, IndexingError};

#[derive(Parser)]
#[command(name = "catalog-search-indexer")]
#[command(about = "Keeps the data catalog search indices in sync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run jobs read from stdin, one JSON object per line
    Worker,
    /// Create every index and populate it from the store
    CreateIndices {
        /// Only create indices that do not exist yet
        #[arg(long)]
        if_missing: bool,
    },
    /// Delete every index
    DeleteIndices,
    /// Sync a single record into its index
    Sync {
        #[arg(value_enum)]
        kind: RecordKind,
        id: i64,
    },
    /// Remove a table from the index
    DeleteTable { id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordKind {
    DataDoc,
    Table,
    User,
}

impl Command {
    fn into_job(self) -> Option<SyncJob> {
        match self {
            Command::Worker => None,
            Command::CreateIndices { if_missing: false } => Some(SyncJob::CreateIndices),
            Command::CreateIndices { if_missing: true } => Some(SyncJob::CreateIndicesIfMissing),
            Command::DeleteIndices => Some(SyncJob::DeleteIndices),
            Command::Sync { kind, id } => Some(match kind {
                RecordKind::DataDoc => SyncJob::UpdateDataDoc { id },
                RecordKind::Table => SyncJob::UpdateTable { id },
                RecordKind::User => SyncJob::UpdateUser { id },
            }),
            Command::DeleteTable { id } => Some(SyncJob::DeleteTable { id }),
        }
    }
}

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("catalog_search_indexer=info,catalog_search_repository=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "catalog-search-indexer",
        service_version = env!("CARGO_PKG_VERSION"),
        json = json,
        "Tracing initialized"
    );
}

async fn run_worker(executor: JobExecutor, config: &IndexerConfig) {
    let mut orchestrator = Orchestrator::with_config(
        LineJobSource::stdin(),
        executor,
        config.orchestrator_config(),
    );
    let stats = orchestrator.run().await;
    info!(
        jobs_succeeded = stats.jobs_succeeded,
        jobs_failed = stats.jobs_failed,
        "Worker finished"
    );
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = IndexerConfig::from_env();

    info!("Starting catalog search indexer");

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let job = match cli.command.unwrap_or(Command::Worker).into_job() {
        Some(job) => job,
        None => {
            run_worker(deps.executor, &config).await;
            return Ok(());
        }
    };

    let result = deps.executor.execute(&job).await;

    match result {
        Ok(()) => {
            info!(job = %job, "Job completed successfully");
            Ok(())
        }
        Err(e) => {
            error!(job = %job, error = %e, "Job failed");
            Err(e.into())
        }
    }
}
