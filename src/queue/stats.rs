//! Queue outcome counters.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::job::JobOutcome;

/// Counts job outcomes; safe to share between the worker and observers.
#[derive(Debug, Default)]
pub struct QueueStats {
    enqueued: AtomicUsize,
    completed: AtomicUsize,
    soft_failures: AtomicUsize,
    retries: AtomicUsize,
    dropped: AtomicUsize,
}

/// Point-in-time copy of [`QueueStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStatsSnapshot {
    pub enqueued: usize,
    pub completed: usize,
    pub soft_failures: usize,
    pub retries: usize,
    pub dropped: usize,
}

impl QueueStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record(&self, outcome: &JobOutcome) {
        let counter = match outcome {
            JobOutcome::Completed => &self.completed,
            JobOutcome::SoftFailure(_) => &self.soft_failures,
            JobOutcome::Retrying { .. } => &self.retries,
            JobOutcome::Dropped { .. } => &self.dropped,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> QueueStatsSnapshot {
        QueueStatsSnapshot {
            enqueued: self.enqueued.load(Ordering::SeqCst),
            completed: self.completed.load(Ordering::SeqCst),
            soft_failures: self.soft_failures.load(Ordering::SeqCst),
            retries: self.retries.load(Ordering::SeqCst),
            dropped: self.dropped.load(Ordering::SeqCst),
        }
    }
}
