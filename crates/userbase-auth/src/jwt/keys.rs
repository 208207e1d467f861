//! The access and refresh codecs built from configuration.

use chrono::TimeDelta;

use userbase_core::config::AuthConfig;
use userbase_core::error::AppError;
use userbase_core::result::AppResult;

use super::codec::TokenCodec;

/// Both token codecs plus the public keys they verify with.
///
/// Every lifetime setting is checked here: a zero or overflowing window is
/// a configuration error.
#[derive(Debug, Clone)]
pub struct AuthKeys {
    /// Codec for short-lived access tokens.
    pub access: TokenCodec,
    /// Codec for long-lived refresh tokens.
    pub refresh: TokenCodec,
    reset_token_ttl: TimeDelta,
    access_public_key: String,
    refresh_public_key: String,
}

impl AuthKeys {
    /// Parse all four keys from configuration.
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        let required = [
            ("auth.access_token_private_key", &config.access_token_private_key),
            ("auth.access_token_public_key", &config.access_token_public_key),
            ("auth.refresh_token_private_key", &config.refresh_token_private_key),
            ("auth.refresh_token_public_key", &config.refresh_token_public_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::configuration(format!("{name} is not set")));
            }
        }

        let access = TokenCodec::from_base64_pem(
            &config.access_token_private_key,
            &config.access_token_public_key,
            minutes("auth.access_token_ttl_minutes", config.access_token_ttl_minutes)?,
            &config.issuer,
            config.leeway_seconds,
        )?;
        let refresh = TokenCodec::from_base64_pem(
            &config.refresh_token_private_key,
            &config.refresh_token_public_key,
            minutes("auth.refresh_token_ttl_minutes", config.refresh_token_ttl_minutes)?,
            &config.issuer,
            config.leeway_seconds,
        )?;

        let reset_token_ttl =
            minutes("auth.reset_token_ttl_minutes", config.reset_token_ttl_minutes)?;

        Ok(Self {
            access,
            refresh,
            reset_token_ttl,
            access_public_key: config.access_token_public_key.trim().to_string(),
            refresh_public_key: config.refresh_token_public_key.trim().to_string(),
        })
    }

    /// How long a password reset token stays valid.
    pub fn reset_token_ttl(&self) -> TimeDelta {
        self.reset_token_ttl
    }

    /// Base64 PEM public key that verifies access tokens.
    pub fn access_public_key(&self) -> &str {
        &self.access_public_key
    }

    /// Base64 PEM public key that verifies refresh tokens.
    pub fn refresh_public_key(&self) -> &str {
        &self.refresh_public_key
    }
}

fn minutes(name: &str, value: u64) -> AppResult<TimeDelta> {
    if value == 0 {
        return Err(AppError::configuration(format!("{name} must be positive")));
    }
    i64::try_from(value)
        .ok()
        .and_then(TimeDelta::try_minutes)
        .ok_or_else(|| AppError::configuration(format!("{name} is out of range")))
}
