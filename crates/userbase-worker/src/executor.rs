//! Job executor: dispatches jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use userbase_core::error::AppError;
use userbase_entity::job::Job;

/// A handler for one job type.
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// The `job_type` this handler processes.
    fn job_type(&self) -> &str;

    /// Run one attempt of the job.
    async fn execute(&self, job: &Job) -> Result<(), JobExecutionError>;
}

/// Why a job attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Do not retry.
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Retry with backoff while attempts remain.
    #[error("Transient job failure: {0}")]
    Transient(String),

    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

impl JobExecutionError {
    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Dispatches jobs to the handler registered for their type.
#[derive(Debug, Default)]
pub struct JobExecutor {
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler, replacing any previous one for the same type.
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        info!(job_type = %job_type, "Registered job handler");
        self.handlers.insert(job_type, handler);
    }

    /// Execute a job by dispatching to the correct handler.
    pub async fn execute(&self, job: &Job) -> Result<(), JobExecutionError> {
        let handler = self.handlers.get(&job.job_type).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for job type '{}'",
                job.job_type
            ))
        })?;
        handler.execute(job).await
    }

    /// Registered job types.
    pub fn registered_types(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }
}
