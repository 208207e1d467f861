//! Outbound notification seam.
//!
//! Services hand finished emails to an [`EmailDispatcher`] and return as soon
//! as the job is accepted. Delivery happens later in the worker.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::worker::QUEUE_CRITICAL;
use crate::result::AppResult;

/// A fully composed email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub body_html: String,
    /// Plain text body.
    pub body_plain: String,
}

/// Delivery options attached to an enqueued email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueueOptions {
    /// Retries allowed after the first failed attempt.
    pub max_retry: u32,
    /// Delay before the first attempt.
    pub delay: Duration,
    /// Target queue name.
    pub queue: String,
}

impl EnqueueOptions {
    /// Options used for account emails (verification and password reset).
    pub fn account_email() -> Self {
        Self {
            max_retry: 10,
            delay: Duration::from_secs(10),
            queue: QUEUE_CRITICAL.to_string(),
        }
    }
}

/// Accepts emails into the asynchronous delivery queue.
#[async_trait]
pub trait EmailDispatcher: Send + Sync + std::fmt::Debug + 'static {
    /// Enqueue an email. Returns once the job is stored, not once delivered.
    async fn enqueue(&self, email: EmailMessage, options: EnqueueOptions) -> AppResult<()>;
}
