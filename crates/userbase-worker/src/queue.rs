//! The `jobs` table as a queue, and the email dispatcher built on it.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;
use uuid::Uuid;

use userbase_core::error::AppError;
use userbase_core::result::AppResult;
use userbase_core::traits::{EmailDispatcher, EmailMessage, EnqueueOptions};
use userbase_database::repositories::JobRepository;
use userbase_entity::job::{CreateJob, Job};

use crate::jobs::send_email::SEND_EMAIL_JOB;

/// Job queue for enqueuing and claiming work.
#[derive(Debug, Clone)]
pub struct JobQueue {
    repo: JobRepository,
    worker_id: String,
}

impl JobQueue {
    pub fn new(repo: JobRepository, worker_id: impl Into<String>) -> Self {
        Self {
            repo,
            worker_id: worker_id.into(),
        }
    }

    /// Identifier written into claimed jobs.
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Store a new pending job.
    pub async fn enqueue(&self, job: CreateJob) -> AppResult<Job> {
        let job = self.repo.create(&job).await?;
        debug!(job_id = %job.id, job_type = %job.job_type, queue = %job.queue, "Job enqueued");
        Ok(job)
    }

    /// Claim the next due job, trying queues in the given order.
    pub async fn dequeue(&self, queues: &[&str]) -> AppResult<Option<Job>> {
        for queue in queues {
            if let Some(job) = self.repo.dequeue(queue, &self.worker_id).await? {
                debug!(job_id = %job.id, queue = %queue, "Job claimed");
                return Ok(Some(job));
            }
        }
        Ok(None)
    }

    pub async fn complete(&self, job_id: Uuid) -> AppResult<()> {
        self.repo.complete(job_id).await
    }

    pub async fn fail(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        self.repo.fail(job_id, error).await
    }

    /// Put a job back to pending, due at `run_at`.
    pub async fn retry_at(&self, job_id: Uuid, error: &str, run_at: DateTime<Utc>) -> AppResult<()> {
        self.repo.reschedule(job_id, error, run_at).await
    }

    /// Release jobs whose worker stopped before `stale_before`.
    pub async fn requeue_stale(&self, stale_before: DateTime<Utc>) -> AppResult<u64> {
        self.repo.requeue_stale(stale_before).await
    }
}

/// `EmailDispatcher` that stores each email as a `send_email` job.
#[derive(Debug, Clone)]
pub struct EmailDistributor {
    queue: JobQueue,
}

impl EmailDistributor {
    pub fn new(queue: JobQueue) -> Self {
        Self { queue }
    }
}

#[async_trait]
impl EmailDispatcher for EmailDistributor {
    async fn enqueue(&self, email: EmailMessage, options: EnqueueOptions) -> AppResult<()> {
        let job = email_job(&email, &options, Utc::now())?;
        self.queue.enqueue(job).await?;
        Ok(())
    }
}

/// Build the job row for an email: due after the delay, with one attempt
/// plus `max_retry` retries.
pub fn email_job(
    email: &EmailMessage,
    options: &EnqueueOptions,
    now: DateTime<Utc>,
) -> AppResult<CreateJob> {
    let delay = TimeDelta::from_std(options.delay)
        .map_err(|_| AppError::validation("Email delay is out of range"))?;
    let max_attempts = i32::try_from(options.max_retry)
        .ok()
        .and_then(|retries| retries.checked_add(1))
        .ok_or_else(|| AppError::validation("Email max_retry is out of range"))?;

    Ok(CreateJob {
        job_type: SEND_EMAIL_JOB.to_string(),
        queue: options.queue.clone(),
        payload: serde_json::to_value(email)?,
        max_attempts,
        scheduled_at: now + delay,
    })
}
