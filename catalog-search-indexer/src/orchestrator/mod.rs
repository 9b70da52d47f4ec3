//! Orchestrator module for the catalog search indexer.
//!
//! Pulls jobs from a source and runs them one at a time through the executor.

use std::time::Instant;

use tokio::sync::broadcast;
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};
use tracing::{error, info, instrument, warn};

use crate::jobs::{JobExecutor, JobSource, SyncJob};

/// Default interval between progress log lines.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Attempts per job, counting the first one. `1` disables retries.
    pub max_attempts: u32,
    /// Pause between attempts of the same job.
    pub retry_delay: Duration,
    /// How often progress is logged while running.
    pub progress_interval: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            retry_delay: Duration::from_millis(1000),
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

/// Counters for one orchestrator run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrchestratorStats {
    /// Jobs read from the source, including unreadable ones.
    pub jobs_received: u64,
    pub jobs_succeeded: u64,
    /// Jobs that still failed after their last attempt.
    pub jobs_failed: u64,
    /// Source items that could not be parsed into a job.
    pub invalid_jobs: u64,
    /// Extra attempts made across all jobs.
    pub retries: u64,
}

/// Orchestrator that feeds jobs from a source to the executor.
///
/// The orchestrator:
/// - Runs jobs in arrival order, one at a time
/// - Retries failed jobs according to its configuration
/// - Handles shutdown signals
/// - Logs progress periodically
pub struct Orchestrator<S> {
    source: S,
    executor: JobExecutor,
    config: OrchestratorConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl<S: JobSource> Orchestrator<S> {
    /// Create a new orchestrator with default configuration.
    pub fn new(source: S, executor: JobExecutor) -> Self {
        Self::with_config(source, executor, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(source: S, executor: JobExecutor, config: OrchestratorConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            source,
            executor,
            config,
            shutdown_tx,
        }
    }

    /// Sender that stops a running orchestrator when signalled.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Trigger a graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Run until the source is exhausted, Ctrl-C arrives or shutdown is triggered.
    ///
    /// A job in progress always finishes before the orchestrator stops.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> OrchestratorStats {
        info!("Starting catalog search orchestrator");

        let Self {
            source,
            executor,
            config,
            shutdown_tx,
        } = self;

        let mut shutdown_rx = shutdown_tx.subscribe();
        let mut stats = OrchestratorStats::default();

        let mut progress_timer = interval(config.progress_interval);
        progress_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        progress_timer.tick().await;

        let mut prev_jobs: u64 = 0;
        let mut prev_time = Instant::now();

        loop {
            tokio::select! {
                next = source.next_job() => {
                    match next {
                        Some(Ok(job)) => {
                            stats.jobs_received += 1;
                            run_job(executor, config, &job, &mut stats).await;
                        }
                        Some(Err(e)) => {
                            stats.jobs_received += 1;
                            stats.invalid_jobs += 1;
                            warn!(error = %e, "Skipping unreadable job");
                        }
                        None => {
                            info!("Job source exhausted");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown requested");
                    break;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    let _ = shutdown_tx.send(());
                    break;
                }
                _ = progress_timer.tick() => {
                    let now = Instant::now();
                    let elapsed_secs = now.duration_since(prev_time).as_secs_f64();
                    let jobs_per_sec = if elapsed_secs > 0.0 {
                        (stats.jobs_received.saturating_sub(prev_jobs) as f64) / elapsed_secs
                    } else {
                        0.0
                    };

                    info!(
                        jobs_received = stats.jobs_received,
                        jobs_succeeded = stats.jobs_succeeded,
                        jobs_failed = stats.jobs_failed,
                        jobs_per_sec = format!("{:.2}", jobs_per_sec),
                        "Processing progress"
                    );

                    prev_jobs = stats.jobs_received;
                    prev_time = now;
                }
            }
        }

        info!(
            jobs_received = stats.jobs_received,
            jobs_succeeded = stats.jobs_succeeded,
            jobs_failed = stats.jobs_failed,
            invalid_jobs = stats.invalid_jobs,
            retries = stats.retries,
            "Orchestrator shutdown complete"
        );
        stats
    }
}

/// Execute `job`, retrying up to the configured number of attempts.
async fn run_job(
    executor: &JobExecutor,
    config: &OrchestratorConfig,
    job: &SyncJob,
    stats: &mut OrchestratorStats,
) {
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match executor.execute(job).await {
            Ok(()) => {
                stats.jobs_succeeded += 1;
                return;
            }
            Err(e) if attempt < max_attempts => {
                warn!(
                    job = %job,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    error = %e,
                    "Job failed, retrying"
                );
                stats.retries += 1;
                attempt += 1;
                sleep(config.retry_delay).await;
            }
            Err(e) => {
                error!(job = %job, attempts = attempt, error = %e, "Job failed");
                stats.jobs_failed += 1;
                return;
            }
        }
    }
}
