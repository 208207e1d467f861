//! CLI command definitions and dispatch.

pub mod initdata;
pub mod migrate;
pub mod serve;
pub mod worker;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use userbase_core::config::AppConfig;
use userbase_core::config::logging::LoggingConfig;
use userbase_core::error::AppError;
use userbase_database::DatabasePool;

/// userbase: accounts, sessions and items over HTTP
#[derive(Debug, Parser)]
#[command(name = "userbase", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (without it, `config/default` plus
    /// `config/{env}` are read)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Environment overlay to load
    #[arg(short, long, env = "USERBASE_ENV", default_value = "development")]
    pub env: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Email worker
    Worker(worker::WorkerArgs),
    /// Create the first super user
    Initdata(initdata::InitdataArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        init_logging(&config.logging);

        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Worker(args) => worker::execute(args, &config).await,
            Commands::Initdata(args) => initdata::execute(args, &config).await,
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        match &self.config {
            Some(path) => AppConfig::load_file(path),
            None => AppConfig::load(&self.env),
        }
    }
}

/// Initialize tracing from the logging section; `RUST_LOG` wins when set.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {e}");
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<sqlx::PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}
