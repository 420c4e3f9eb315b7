//! Queue worker: claims due jobs, resolves them and reports results.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use log::{debug, error, info, warn};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::backoff::retry_delay;
use super::job::{JobOutcome, QueuedJob, SoftFailure};
use super::stats::{QueueStats, QueueStatsSnapshot};
use super::store::JobStore;
use super::{LocationLookup, LocationUpdater};
use crate::config::{
    JOB_TIMEOUT_SECS, QUEUE_IDLE_POLL_INTERVAL, RETRY_BASE_DELAY_MS, RETRY_MAX_ATTEMPTS,
};
use crate::error_handling::QueueError;

/// Retry and scheduling policy of a [`LocationQueue`].
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Total attempts per job, including the first
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per further attempt
    pub base_delay: Duration,
    /// Upper bound for one attempt (resolution plus update)
    pub job_timeout: Duration,
    /// Longest the worker sleeps before re-checking the store
    pub idle_poll_interval: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
            job_timeout: Duration::from_secs(JOB_TIMEOUT_SECS),
            idle_poll_interval: QUEUE_IDLE_POLL_INTERVAL,
        }
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Durable geolocation job queue with a single asynchronous worker.
///
/// `enqueue` persists the job and returns immediately; the worker started by
/// [`LocationQueue::start`] processes it in the background. Only processing
/// errors (lookup seam errors, update failures, attempt timeouts) are retried;
/// a lookup that finds nothing completes the job without an update.
pub struct LocationQueue {
    store: JobStore,
    lookup: Arc<dyn LocationLookup>,
    updater: Arc<dyn LocationUpdater>,
    config: QueueConfig,
    wake: Notify,
    stats: QueueStats,
}

impl LocationQueue {
    pub fn new(
        store: JobStore,
        lookup: Arc<dyn LocationLookup>,
        updater: Arc<dyn LocationUpdater>,
        config: QueueConfig,
    ) -> Self {
        Self {
            store,
            lookup,
            updater,
            config,
            wake: Notify::new(),
            stats: QueueStats::new(),
        }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn stats(&self) -> QueueStatsSnapshot {
        self.stats.snapshot()
    }

    /// Persists a job for `record_id` and wakes the worker. Returns the job id.
    ///
    /// An empty address is accepted; the job completes as a soft failure.
    pub async fn enqueue(&self, record_id: &str, ip_address: &str) -> Result<i64, QueueError> {
        let id = self.store.push(record_id, ip_address, now_ms()).await?;
        self.stats.record_enqueued();
        self.wake.notify_one();
        debug!("Enqueued location job {} for record {}", id, record_id);
        Ok(id)
    }

    /// Spawns the worker task. It runs until `cancel` fires.
    ///
    /// Jobs interrupted by a previous process are returned to pending first.
    pub fn start(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let queue = Arc::clone(self);
        tokio::spawn(async move { queue.run(cancel).await })
    }

    /// Waits until every job has left the store (completed, soft-failed or dropped).
    pub async fn wait_until_drained(&self, poll: Duration) -> Result<(), QueueError> {
        while !self.store.is_empty().await? {
            tokio::time::sleep(poll).await;
        }
        Ok(())
    }

    async fn run(&self, cancel: CancellationToken) {
        if let Err(e) = self.store.recover_stalled().await {
            error!("Failed to recover interrupted location jobs: {}", e);
        }
        info!("Location queue worker started");

        loop {
            if cancel.is_cancelled() {
                break;
            }

            match self.process_next().await {
                Ok(Some(_)) => continue,
                Ok(None) => {}
                Err(e) => {
                    error!("Location queue store error: {}", e);
                    // Single worker: nothing else is legitimately in processing
                    if let Err(e) = self.store.recover_stalled().await {
                        error!("Failed to return claimed jobs to pending: {}", e);
                    }
                }
            }

            let wait = self.idle_wait().await;
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.wake.notified() => {}
                _ = tokio::time::sleep(wait) => {}
            }
        }

        info!("Location queue worker stopped");
    }

    /// Sleep until the next pending job is due, bounded by the poll interval.
    async fn idle_wait(&self) -> Duration {
        match self.store.next_run_at().await {
            Ok(Some(run_at)) => {
                let until = (run_at - now_ms()).max(0) as u64;
                Duration::from_millis(until).min(self.config.idle_poll_interval)
            }
            Ok(None) => self.config.idle_poll_interval,
            Err(e) => {
                warn!("Could not read next job due time: {}", e);
                self.config.idle_poll_interval
            }
        }
    }

    /// Claims and processes one due job. Returns `None` when nothing is due.
    ///
    /// If recording the result fails, the job is returned to pending and runs
    /// again; the update callback may then see the same record twice.
    pub async fn process_next(&self) -> Result<Option<JobOutcome>, QueueError> {
        let Some(job) = self.store.claim_due(now_ms()).await? else {
            return Ok(None);
        };
        let id = job.id;
        match self.process(job).await {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) => {
                warn!("Could not record result of location job {}: {}", id, e);
                if let Err(release_err) = self.store.release(id).await {
                    error!("Failed to return location job {} to pending: {}", id, release_err);
                }
                Err(e)
            }
        }
    }

    async fn process(&self, job: QueuedJob) -> Result<JobOutcome, QueueError> {
        let attempt = job.attempts + 1;
        let result = match tokio::time::timeout(self.config.job_timeout, self.execute(&job)).await
        {
            Ok(result) => result,
            Err(_) => Err(anyhow!(
                "attempt timed out after {}ms",
                self.config.job_timeout.as_millis()
            )),
        };

        match result {
            Ok(None) => {
                info!("Location job {} completed for record {}", job.id, job.record_id);
                self.finish(&job, JobOutcome::Completed).await
            }
            Ok(Some(reason)) => {
                info!(
                    "Location job {} for record {} finished without location: {}",
                    job.id, job.record_id, reason
                );
                self.finish(&job, JobOutcome::SoftFailure(reason)).await
            }
            Err(e) if attempt < self.config.max_attempts => {
                let delay = retry_delay(self.config.base_delay, attempt);
                warn!(
                    "Location job {} for record {} failed (attempt {}/{}), retrying in {}ms: {:#}",
                    job.id,
                    job.record_id,
                    attempt,
                    self.config.max_attempts,
                    delay.as_millis(),
                    e
                );
                let run_at = now_ms() + delay.as_millis() as i64;
                self.store
                    .reschedule(job.id, attempt, run_at, &format!("{:#}", e))
                    .await?;
                let outcome = JobOutcome::Retrying {
                    attempts: attempt,
                    delay,
                };
                self.stats.record(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                error!(
                    "Location job {} for record {} dropped after {} attempts: {:#}",
                    job.id, job.record_id, attempt, e
                );
                self.finish(&job, JobOutcome::Dropped { attempts: attempt })
                    .await
            }
        }
    }

    async fn finish(&self, job: &QueuedJob, outcome: JobOutcome) -> Result<JobOutcome, QueueError> {
        self.store.remove(job.id).await?;
        self.stats.record(&outcome);
        Ok(outcome)
    }

    /// One attempt. `Ok(None)` means the record was updated.
    async fn execute(&self, job: &QueuedJob) -> anyhow::Result<Option<SoftFailure>> {
        let ip = job.ip_address.trim();
        if ip.is_empty() {
            return Ok(Some(SoftFailure::MissingAddress));
        }

        let Some(location) = self
            .lookup
            .lookup(ip)
            .await
            .with_context(|| format!("Failed to resolve {}", ip))?
        else {
            return Ok(Some(SoftFailure::NotFound));
        };

        self.updater
            .update(&job.record_id, &location)
            .await
            .with_context(|| format!("Failed to update record {}", job.record_id))?;
        Ok(None)
    }
}
