//! Job handlers.

pub mod send_email;

use std::sync::Arc;

use userbase_core::config::EmailConfig;
use userbase_core::result::AppResult;

use crate::executor::JobExecutor;
use crate::mail::build_transport;

pub use send_email::{SEND_EMAIL_JOB, SendEmailHandler};

/// Executor with every built-in handler registered.
pub fn default_executor(email: &EmailConfig) -> AppResult<JobExecutor> {
    let mut executor = JobExecutor::new();
    executor.register(Arc::new(SendEmailHandler::new(build_transport(email)?)));
    Ok(executor)
}
