//! SQLite-backed job store.
//!
//! Jobs survive process restarts: a job is only removed once it completed or
//! exhausted its attempts. Timestamps are epoch milliseconds.

use log::info;
use sqlx::{Row, SqlitePool};

use super::job::{JobStatus, QueuedJob};
use crate::config::MAX_ERROR_MESSAGE_LENGTH;
use crate::error_handling::QueueError;

/// Persistent queue of geolocation jobs.
#[derive(Debug, Clone)]
pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    /// Wraps a pool whose schema has been migrated (see `storage::run_migrations`).
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a pending job due immediately. Returns the job id.
    pub async fn push(&self, record_id: &str, ip_address: &str, now_ms: i64) -> Result<i64, QueueError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO location_jobs (record_id, ip_address, attempts, status, run_at_ms, created_at_ms)
             VALUES (?, ?, 0, ?, ?, ?)
             RETURNING id",
        )
        .bind(record_id)
        .bind(ip_address)
        .bind(JobStatus::Pending.as_str())
        .bind(now_ms)
        .bind(now_ms)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Claims the earliest due pending job, marking it as processing.
    pub async fn claim_due(&self, now_ms: i64) -> Result<Option<QueuedJob>, QueueError> {
        let row = sqlx::query(
            "UPDATE location_jobs SET status = ?
             WHERE id = (
                 SELECT id FROM location_jobs
                 WHERE status = ? AND run_at_ms <= ?
                 ORDER BY run_at_ms, id
                 LIMIT 1
             )
             RETURNING id, record_id, ip_address, attempts",
        )
        .bind(JobStatus::Processing.as_str())
        .bind(JobStatus::Pending.as_str())
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| QueuedJob {
            id: row.get("id"),
            record_id: row.get("record_id"),
            ip_address: row.get("ip_address"),
            attempts: row.get::<i64, _>("attempts").max(0) as u32,
        }))
    }

    /// Removes a job (completed, soft-failed or terminally failed).
    pub async fn remove(&self, id: i64) -> Result<(), QueueError> {
        sqlx::query("DELETE FROM location_jobs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Returns a failed job to pending with its new attempt count and due time.
    pub async fn reschedule(
        &self,
        id: i64,
        attempts: u32,
        run_at_ms: i64,
        error: &str,
    ) -> Result<(), QueueError> {
        let error: String = error.chars().take(MAX_ERROR_MESSAGE_LENGTH).collect();
        sqlx::query(
            "UPDATE location_jobs SET status = ?, attempts = ?, run_at_ms = ?, last_error = ?
             WHERE id = ?",
        )
        .bind(JobStatus::Pending.as_str())
        .bind(attempts as i64)
        .bind(run_at_ms)
        .bind(error)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Returns one claimed job to pending without touching its attempts or due time.
    pub async fn release(&self, id: i64) -> Result<(), QueueError> {
        sqlx::query("UPDATE location_jobs SET status = ? WHERE id = ? AND status = ?")
            .bind(JobStatus::Pending.as_str())
            .bind(id)
            .bind(JobStatus::Processing.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Returns jobs left in processing by a previous process to pending.
    pub async fn recover_stalled(&self) -> Result<u64, QueueError> {
        let result = sqlx::query("UPDATE location_jobs SET status = ? WHERE status = ?")
            .bind(JobStatus::Pending.as_str())
            .bind(JobStatus::Processing.as_str())
            .execute(&self.pool)
            .await?;
        let recovered = result.rows_affected();
        if recovered > 0 {
            info!("Recovered {} interrupted location job(s)", recovered);
        }
        Ok(recovered)
    }

    /// Due time of the earliest pending job, if any.
    pub async fn next_run_at(&self) -> Result<Option<i64>, QueueError> {
        let next = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MIN(run_at_ms) FROM location_jobs WHERE status = ?",
        )
        .bind(JobStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(next)
    }

    /// Number of jobs still in the store (pending or processing).
    pub async fn len(&self) -> Result<i64, QueueError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM location_jobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn is_empty(&self) -> Result<bool, QueueError> {
        Ok(self.len().await? == 0)
    }
}
