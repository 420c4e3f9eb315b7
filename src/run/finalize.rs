//! Run finalization: report assembly and database cleanup.

use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::app::log_progress;
use crate::config::Config;

use super::init::RunResources;
use super::EnrichmentReport;

/// Logs final progress, checkpoints the WAL file and builds the report.
pub(super) async fn finalize_run(
    resources: RunResources,
    config: &Config,
    total_jobs: usize,
    skipped_lines: usize,
    start_time: Instant,
) -> Result<EnrichmentReport> {
    let stats = resources.queue.stats();
    log_progress(start_time, &stats);

    sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
        .execute(&resources.pool)
        .await
        .context("Failed to checkpoint WAL file")?;
    resources.pool.close().await;

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    info!("Enrichment run finished in {:.2}s", elapsed_seconds);

    Ok(EnrichmentReport {
        total_jobs,
        skipped_lines,
        located: stats.completed,
        without_location: stats.soft_failures,
        dropped: stats.dropped,
        retries: stats.retries,
        cached_addresses: resources.cache.len(),
        db_path: config.db_path.clone(),
        elapsed_seconds,
    })
}
