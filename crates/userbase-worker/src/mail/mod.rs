//! Mail transports used by the `send_email` job.

pub mod http;
pub mod log;

use std::sync::Arc;

use async_trait::async_trait;

use userbase_core::config::EmailConfig;
use userbase_core::error::AppError;
use userbase_core::result::AppResult;
use userbase_core::traits::EmailMessage;

pub use self::http::HttpRelayTransport;
pub use self::log::LogTransport;

/// Why a delivery attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The relay or network may recover; try again later.
    #[error("transient delivery failure: {0}")]
    Transient(String),
    /// The message was rejected; retrying will not help.
    #[error("permanent delivery failure: {0}")]
    Permanent(String),
}

/// Delivers one composed email.
#[async_trait]
pub trait MailTransport: Send + Sync + std::fmt::Debug {
    async fn send(&self, email: &EmailMessage) -> Result<(), DeliveryError>;
}

/// Build the transport selected by `email.transport`.
pub fn build_transport(config: &EmailConfig) -> AppResult<Arc<dyn MailTransport>> {
    match config.transport.as_str() {
        "log" => Ok(Arc::new(LogTransport)),
        "http" => Ok(Arc::new(HttpRelayTransport::new(config)?)),
        other => Err(AppError::configuration(format!(
            "Unknown email transport: '{other}'. Supported: log, http"
        ))),
    }
}
