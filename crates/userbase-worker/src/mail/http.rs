//! Transport that posts emails as JSON to an HTTP relay.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use userbase_core::config::EmailConfig;
use userbase_core::error::{AppError, ErrorKind};
use userbase_core::result::AppResult;
use userbase_core::traits::EmailMessage;

use super::{DeliveryError, MailTransport};

/// Posts each email to `email.relay_url`.
///
/// Network errors and 5xx answers are transient; any other non-success
/// status is permanent.
#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpRelayTransport {
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        if config.relay_url.trim().is_empty() {
            return Err(AppError::configuration(
                "email.relay_url must be set for the http transport",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.relay_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build relay client", e)
            })?;

        Ok(Self {
            client,
            url: config.relay_url.clone(),
            token: config.relay_token.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for HttpRelayTransport {
    async fn send(&self, email: &EmailMessage) -> Result<(), DeliveryError> {
        let mut request = self.client.post(&self.url).json(email);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError::Transient(format!("relay unreachable: {e}")))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Relay answered");

        if status.is_success() {
            Ok(())
        } else if status.is_server_error() {
            Err(DeliveryError::Transient(format!("relay returned {status}")))
        } else {
            Err(DeliveryError::Permanent(format!("relay returned {status}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::post;

    use super::*;

    async fn relay_answering(status: StatusCode) -> String {
        let app = Router::new().route("/send", post(move || async move { status }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/send")
    }

    fn transport(url: String) -> HttpRelayTransport {
        HttpRelayTransport::new(&EmailConfig {
            transport: "http".to_string(),
            relay_url: url,
            relay_timeout_seconds: 5,
            ..EmailConfig::default()
        })
        .unwrap()
    }

    fn email() -> EmailMessage {
        EmailMessage {
            from: "no-reply@example.com".to_string(),
            to: "ann@example.com".to_string(),
            subject: "Hello".to_string(),
            body_html: "<p>Hi</p>".to_string(),
            body_plain: "Hi".to_string(),
        }
    }

    #[tokio::test]
    async fn test_status_classification() {
        let ok = transport(relay_answering(StatusCode::ACCEPTED).await);
        assert!(ok.send(&email()).await.is_ok());

        let down = transport(relay_answering(StatusCode::SERVICE_UNAVAILABLE).await);
        assert!(matches!(
            down.send(&email()).await,
            Err(DeliveryError::Transient(_))
        ));

        let rejected = transport(relay_answering(StatusCode::UNPROCESSABLE_ENTITY).await);
        assert!(matches!(
            rejected.send(&email()).await,
            Err(DeliveryError::Permanent(_))
        ));
    }

    #[test]
    fn test_missing_relay_url_is_rejected() {
        let config = EmailConfig {
            transport: "http".to_string(),
            ..EmailConfig::default()
        };
        let err = HttpRelayTransport::new(&config).unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
    }
}
