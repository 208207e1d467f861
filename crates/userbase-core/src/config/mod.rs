//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! `config/default.toml`, an environment overlay and `USERBASE__*`
//! environment variables. Each sub-module represents a logical section.

pub mod app;
pub mod auth;
pub mod cache;
pub mod email;
pub mod logging;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::AuthConfig;
pub use self::cache::CacheConfig;
pub use self::email::EmailConfig;
pub use self::logging::LoggingConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Token signing and credential settings.
    pub auth: AuthConfig,
    /// Account created by `initdata` when it does not exist yet.
    #[serde(default)]
    pub first_super_user: FirstSuperUserConfig,
    /// Outbound email settings.
    #[serde(default)]
    pub email: EmailConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

/// Bootstrap super-user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstSuperUserConfig {
    /// Display name.
    #[serde(default = "default_super_user_name")]
    pub name: String,
    /// Login email.
    #[serde(default = "default_super_user_email")]
    pub email: String,
    /// Initial password.
    #[serde(default = "default_super_user_password")]
    pub password: String,
}

impl Default for FirstSuperUserConfig {
    fn default() -> Self {
        Self {
            name: default_super_user_name(),
            email: default_super_user_email(),
            password: default_super_user_password(),
        }
    }
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default`, `config/{env}` and environment variables
    /// prefixed with `USERBASE__` (nested keys separated by `__`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("USERBASE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Load configuration from an explicit file path, still honouring
    /// environment variable overrides.
    pub fn load_file(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix("USERBASE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_super_user_name() -> String {
    "Administrator".to_string()
}

fn default_super_user_email() -> String {
    "admin@example.com".to_string()
}

fn default_super_user_password() -> String {
    "changethis".to_string()
}
