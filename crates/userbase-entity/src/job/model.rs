//! Job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::JobStatus;

/// A queued unit of background work.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Unique job identifier.
    pub id: Uuid,
    /// Handler key (e.g. `"send_email"`).
    pub job_type: String,
    /// Queue name.
    pub queue: String,
    /// Job-specific payload (JSON).
    pub payload: serde_json::Value,
    /// Error message of the last failed attempt.
    pub error_message: Option<String>,
    /// Current job status.
    pub status: JobStatus,
    /// Number of execution attempts so far.
    pub attempts: i32,
    /// Maximum allowed attempts (first try included).
    pub max_attempts: i32,
    /// Earliest time the job may run.
    pub scheduled_at: DateTime<Utc>,
    /// When the current attempt started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the job completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Worker that claimed the job.
    pub worker_id: Option<String>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the job was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Whether another attempt is allowed after the current one failed.
    pub fn can_retry(&self) -> bool {
        self.attempts < self.max_attempts
    }
}

/// Data required to create a new job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    /// Handler key.
    pub job_type: String,
    /// Queue name.
    pub queue: String,
    /// Job-specific payload.
    pub payload: serde_json::Value,
    /// Maximum attempts (first try included).
    pub max_attempts: i32,
    /// Earliest execution time.
    pub scheduled_at: DateTime<Utc>,
}
