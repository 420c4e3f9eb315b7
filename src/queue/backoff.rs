//! Retry delay schedule for failed jobs.

use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

use crate::config::{RETRY_FACTOR, RETRY_MAX_DELAY_SECS};

/// Creates the exponential backoff schedule for a given base delay.
///
/// Yields `base`, `base * 2`, `base * 4`, ... capped at `RETRY_MAX_DELAY_SECS`.
/// `ExponentialBackoff` yields `factor * growth^n`, so the base is split into
/// the growth factor and `base / growth`; odd millisecond bases round down.
pub fn retry_schedule(base: Duration) -> impl Iterator<Item = Duration> {
    let base_ms = base.as_millis() as u64;
    ExponentialBackoff::from_millis(RETRY_FACTOR)
        .factor((base_ms / RETRY_FACTOR).max(1))
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
}

/// Delay before the next attempt of a job that has failed `attempts` times.
pub fn retry_delay(base: Duration, attempts: u32) -> Duration {
    let index = attempts.saturating_sub(1) as usize;
    retry_schedule(base)
        .nth(index)
        .unwrap_or(Duration::from_secs(RETRY_MAX_DELAY_SECS))
}
