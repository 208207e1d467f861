//! Token signing and credential configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
///
/// Key material is supplied as base64-encoded PEM. The access and refresh
/// pairs must be distinct so that neither token kind verifies as the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// `iss` claim written into every token.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: u64,
    /// Refresh token lifetime in minutes.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_minutes: u64,
    /// Base64 PEM RSA private key for access tokens.
    #[serde(default)]
    pub access_token_private_key: String,
    /// Base64 PEM RSA public key for access tokens.
    #[serde(default)]
    pub access_token_public_key: String,
    /// Base64 PEM RSA private key for refresh tokens.
    #[serde(default)]
    pub refresh_token_private_key: String,
    /// Base64 PEM RSA public key for refresh tokens.
    #[serde(default)]
    pub refresh_token_public_key: String,
    /// Lifetime of cached user profiles in seconds.
    #[serde(default = "default_user_cache_ttl")]
    pub user_cache_ttl_seconds: u64,
    /// Validity window of a password reset token in minutes.
    #[serde(default = "default_reset_ttl")]
    pub reset_token_ttl_minutes: u64,
    /// Clock skew tolerated when validating `exp`/`nbf`, in seconds.
    #[serde(default)]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            access_token_ttl_minutes: default_access_ttl(),
            refresh_token_ttl_minutes: default_refresh_ttl(),
            access_token_private_key: String::new(),
            access_token_public_key: String::new(),
            refresh_token_private_key: String::new(),
            refresh_token_public_key: String::new(),
            user_cache_ttl_seconds: default_user_cache_ttl(),
            reset_token_ttl_minutes: default_reset_ttl(),
            leeway_seconds: 0,
        }
    }
}

fn default_issuer() -> String {
    "userbase".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    60 * 24 * 7
}

fn default_user_cache_ttl() -> u64 {
    3600
}

fn default_reset_ttl() -> u64 {
    15
}
