//! Progress logging utilities.

use log::info;
use std::time::Instant;

use crate::queue::QueueStatsSnapshot;

/// Logs a one-line summary of queue outcomes so far.
pub fn log_progress(start_time: Instant, stats: &QueueStatsSnapshot) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let finished = stats.completed + stats.soft_failures + stats.dropped;
    let rate = if elapsed_secs > 0.0 {
        finished as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Processed {} of {} jobs in {:.2} seconds (~{:.2} jobs/sec): {} located, {} without location, {} dropped, {} retries",
        finished,
        stats.enqueued,
        elapsed_secs,
        rate,
        stats.completed,
        stats.soft_failures,
        stats.dropped,
        stats.retries
    );
}
