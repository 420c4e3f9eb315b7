//! Durable geolocation job queue.
//!
//! Jobs are persisted in SQLite, processed one at a time by a background
//! worker and retried with exponential backoff when processing fails.

mod backoff;
mod job;
mod stats;
mod store;
mod worker;

use async_trait::async_trait;

use crate::geolocation::{GeoResolver, LocationRecord};

pub use backoff::{retry_delay, retry_schedule};
pub use job::{JobOutcome, JobStatus, QueuedJob, SoftFailure};
pub use stats::{QueueStats, QueueStatsSnapshot};
pub use store::JobStore;
pub use worker::{LocationQueue, QueueConfig};

/// Resolves an address to a location for the queue worker.
///
/// `Ok(None)` completes the job without an update; `Err` is retried.
#[async_trait]
pub trait LocationLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> anyhow::Result<Option<LocationRecord>>;
}

#[async_trait]
impl LocationLookup for GeoResolver {
    async fn lookup(&self, ip: &str) -> anyhow::Result<Option<LocationRecord>> {
        Ok(self.resolve(ip).await)
    }
}

/// Receives resolved locations. Failures are retried like lookup errors.
#[async_trait]
pub trait LocationUpdater: Send + Sync {
    async fn update(&self, record_id: &str, location: &LocationRecord) -> anyhow::Result<()>;
}
