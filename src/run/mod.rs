//! Enrichment run: reads `identifier ip` pairs, queues them and waits until
//! every job has been resolved, skipped or dropped.

mod finalize;
mod init;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::app::{log_progress, parse_job_line, shutdown_gracefully};
use crate::config::{Config, LOGGING_INTERVAL, QUEUE_DRAIN_POLL_INTERVAL};
use crate::queue::LocationQueue;

use finalize::finalize_run;
use init::{init_run_resources, RunResources};

/// Results of an enrichment run.
#[derive(Debug, Clone)]
pub struct EnrichmentReport {
    /// Jobs enqueued from the input
    pub total_jobs: usize,
    /// Blank and comment lines in the input
    pub skipped_lines: usize,
    /// Jobs whose record received a location
    pub located: usize,
    /// Jobs that finished without a location (no address, private, or not found)
    pub without_location: usize,
    /// Jobs dropped after exhausting their retries
    pub dropped: usize,
    /// Retry attempts scheduled during the run
    pub retries: usize,
    /// Distinct addresses held by the resolution cache at the end of the run
    pub cached_addresses: usize,
    /// Path to the SQLite database holding the resolved locations
    pub db_path: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Runs an enrichment pass with the provided configuration.
///
/// Jobs left over from an interrupted earlier run in the same database are
/// picked up as well.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the database cannot be
/// initialized. Individual lookup failures are not errors; they show up in the
/// report counters.
pub async fn run_enrichment(config: Config) -> Result<EnrichmentReport> {
    let start_time = Instant::now();
    let resources = init_run_resources(&config).await?;

    let cancel = CancellationToken::new();
    let worker = resources.queue.start(cancel.clone());

    let processed = enqueue_and_drain(&config.file, &resources, start_time).await;
    shutdown_gracefully(cancel, worker).await;
    let (total_jobs, skipped_lines) = processed?;

    finalize_run(resources, &config, total_jobs, skipped_lines, start_time).await
}

async fn enqueue_and_drain(
    path: &Path,
    resources: &RunResources,
    start_time: Instant,
) -> Result<(usize, usize)> {
    let reader = open_input(path).await?;
    let counts = enqueue_lines(reader, &resources.queue).await?;
    info!("Enqueued {} job(s), waiting for the queue to drain", counts.0);

    let drain = resources.queue.wait_until_drained(QUEUE_DRAIN_POLL_INTERVAL);
    tokio::pin!(drain);
    let mut ticker = tokio::time::interval(LOGGING_INTERVAL);
    ticker.tick().await;
    loop {
        tokio::select! {
            result = &mut drain => {
                result.context("Failed to check the job store")?;
                break;
            }
            _ = ticker.tick() => log_progress(start_time, &resources.queue.stats()),
        }
    }
    Ok(counts)
}

async fn open_input(path: &Path) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    if path.as_os_str() == "-" {
        info!("Reading jobs from stdin");
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }
    let file = File::open(path)
        .await
        .with_context(|| format!("Failed to open input file {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Enqueues every job line. Returns `(enqueued, skipped)` line counts.
async fn enqueue_lines<R>(reader: R, queue: &LocationQueue) -> Result<(usize, usize)>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut enqueued = 0usize;
    let mut skipped = 0usize;
    while let Some(line) = lines.next_line().await.context("Failed to read input line")? {
        match parse_job_line(&line) {
            Some((record_id, ip)) => {
                queue
                    .enqueue(&record_id, &ip)
                    .await
                    .with_context(|| format!("Failed to enqueue job for {}", record_id))?;
                enqueued += 1;
            }
            None => skipped += 1,
        }
    }
    Ok((enqueued, skipped))
}
