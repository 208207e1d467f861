//! Outbound email configuration.

use serde::{Deserialize, Serialize};

/// Email settings used when composing and delivering account emails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Sender address.
    #[serde(default = "default_from")]
    pub from: String,
    /// Product name shown in email bodies.
    #[serde(default = "default_name")]
    pub name: String,
    /// Public base URL used to build verification and reset links.
    #[serde(default = "default_link")]
    pub link: String,
    /// Subject of the verification email.
    #[serde(default = "default_verification_subject")]
    pub verification_subject: String,
    /// Subject of the password reset email.
    #[serde(default = "default_reset_subject")]
    pub reset_subject: String,
    /// Delivery transport: `"log"` or `"http"`.
    #[serde(default = "default_transport")]
    pub transport: String,
    /// Relay endpoint used by the `"http"` transport.
    #[serde(default)]
    pub relay_url: String,
    /// Optional bearer token sent to the relay.
    #[serde(default)]
    pub relay_token: Option<String>,
    /// Relay request timeout in seconds.
    #[serde(default = "default_relay_timeout")]
    pub relay_timeout_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: default_from(),
            name: default_name(),
            link: default_link(),
            verification_subject: default_verification_subject(),
            reset_subject: default_reset_subject(),
            transport: default_transport(),
            relay_url: String::new(),
            relay_token: None,
            relay_timeout_seconds: default_relay_timeout(),
        }
    }
}

fn default_from() -> String {
    "no-reply@example.com".to_string()
}

fn default_name() -> String {
    "userbase".to_string()
}

fn default_link() -> String {
    "http://localhost:5000".to_string()
}

fn default_verification_subject() -> String {
    "Your account verification code".to_string()
}

fn default_reset_subject() -> String {
    "Your password reset token (valid for 15 minutes)".to_string()
}

fn default_transport() -> String {
    "log".to_string()
}

fn default_relay_timeout() -> u64 {
    10
}
