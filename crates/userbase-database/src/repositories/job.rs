//! Job repository: the PostgreSQL-backed queue used by the worker.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use userbase_core::error::{AppError, ErrorKind};
use userbase_core::result::AppResult;
use userbase_entity::job::model::{CreateJob, Job};
use userbase_entity::job::status::JobStatus;

/// Repository for background job storage and queue operations.
#[derive(Debug, Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    /// Create a new job repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a job by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find job", e))
    }

    /// Claim the oldest due job from `queue` (SKIP LOCKED for concurrency).
    pub async fn dequeue(&self, queue: &str, worker_id: &str) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET status = 'running', started_at = NOW(), worker_id = $2, \
             attempts = attempts + 1, updated_at = NOW() \
             WHERE id = ( \
                SELECT id FROM jobs \
                WHERE queue = $1 AND status = 'pending' AND scheduled_at <= NOW() \
                ORDER BY scheduled_at ASC, created_at ASC \
                FOR UPDATE SKIP LOCKED \
                LIMIT 1 \
             ) RETURNING *",
        )
        .bind(queue)
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to dequeue job", e))
    }

    /// Create a new job.
    pub async fn create(&self, data: &CreateJob) -> AppResult<Job> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (job_type, queue, payload, max_attempts, scheduled_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.job_type)
        .bind(&data.queue)
        .bind(&data.payload)
        .bind(data.max_attempts)
        .bind(data.scheduled_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create job", e))
    }

    /// Mark a job as completed.
    pub async fn complete(&self, job_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'completed', error_message = NULL, completed_at = NOW(), \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(job_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete job", e))?;
        Ok(())
    }

    /// Mark a job as permanently failed.
    pub async fn fail(&self, job_id: Uuid, error_message: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'failed', error_message = $2, completed_at = NOW(), \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(job_id)
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark job as failed", e)
        })?;
        Ok(())
    }

    /// Put a running job back to pending, to run again at `run_at`.
    pub async fn reschedule(
        &self,
        job_id: Uuid,
        error_message: &str,
        run_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'pending', error_message = $2, scheduled_at = $3, \
             started_at = NULL, worker_id = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(job_id)
        .bind(error_message)
        .bind(run_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reschedule job", e))?;
        Ok(())
    }

    /// Count jobs in a given status.
    pub async fn count_by_status(&self, status: JobStatus) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count jobs", e))
    }

    /// Return jobs left `running` by a worker that died before `stale_before`
    /// to the pending state.
    pub async fn requeue_stale(&self, stale_before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE jobs SET status = 'pending', worker_id = NULL, started_at = NULL, \
             updated_at = NOW() WHERE status = 'running' AND started_at < $1",
        )
        .bind(stale_before)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to requeue jobs", e))?;
        Ok(result.rows_affected())
    }
}
