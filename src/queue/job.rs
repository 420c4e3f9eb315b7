//! Queued job data structures.

use std::time::Duration;

/// Persisted state of a job that is still in the store.
///
/// Completed and terminally failed jobs are deleted, so they have no stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Waiting for its `run_at` time
    Pending,
    /// Claimed by the worker
    Processing,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
        }
    }
}

/// A geolocation job as claimed from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedJob {
    /// Store row id
    pub id: i64,
    /// Opaque handle of the record to update
    pub record_id: String,
    /// Raw address as enqueued (prefix not yet stripped)
    pub ip_address: String,
    /// Failed attempts so far (0 on the first run)
    pub attempts: u32,
}

/// What happened to a job after one processing attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// Location resolved and the update callback succeeded
    Completed,
    /// Finished without a location (no address, or nothing found); never retried
    SoftFailure(SoftFailure),
    /// Processing failed; the job runs again after `delay`
    Retrying { attempts: u32, delay: Duration },
    /// Processing failed on the last allowed attempt; the job was dropped
    Dropped { attempts: u32 },
}

/// Reasons a job completes without updating its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftFailure {
    MissingAddress,
    NotFound,
}

impl std::fmt::Display for SoftFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoftFailure::MissingAddress => f.write_str("no IP address on job"),
            SoftFailure::NotFound => f.write_str("no location found"),
        }
    }
}
