//! Delivers queued account emails.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use userbase_core::traits::EmailMessage;
use userbase_entity::job::Job;

use crate::executor::{JobExecutionError, JobHandler};
use crate::mail::{DeliveryError, MailTransport};

/// `job_type` of email delivery jobs.
pub const SEND_EMAIL_JOB: &str = "send_email";

/// Hands the stored email to the configured transport.
#[derive(Debug)]
pub struct SendEmailHandler {
    transport: Arc<dyn MailTransport>,
}

impl SendEmailHandler {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl JobHandler for SendEmailHandler {
    fn job_type(&self) -> &str {
        SEND_EMAIL_JOB
    }

    async fn execute(&self, job: &Job) -> Result<(), JobExecutionError> {
        let email: EmailMessage = serde_json::from_value(job.payload.clone())
            .map_err(|e| JobExecutionError::Permanent(format!("malformed email payload: {e}")))?;

        self.transport.send(&email).await.map_err(|e| match e {
            DeliveryError::Transient(msg) => JobExecutionError::Transient(msg),
            DeliveryError::Permanent(msg) => JobExecutionError::Permanent(msg),
        })?;

        info!(job_id = %job.id, to = %email.to, "Email sent");
        Ok(())
    }
}
