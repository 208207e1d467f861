//! Transport that only records deliveries in the log.

use async_trait::async_trait;
use tracing::info;

use userbase_core::traits::EmailMessage;

use super::{DeliveryError, MailTransport};

/// Logs each email instead of sending it. Used in development.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, email: &EmailMessage) -> Result<(), DeliveryError> {
        info!(to = %email.to, subject = %email.subject, "Email delivered to log transport");
        Ok(())
    }
}
