//! userbase server: account, session and item REST backend.
//!
//! Loads configuration, prepares the database and hands over to the API
//! crate, which wires the remaining components together.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use userbase_core::config::AppConfig;
use userbase_database::DatabasePool;
use userbase_database::migration::run_migrations;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e:#}");
        std::process::exit(1);
    }
}

/// `USERBASE_CONFIG` names an explicit file; otherwise `config/default` and
/// `config/{USERBASE_ENV}` are layered.
fn load_configuration() -> anyhow::Result<AppConfig> {
    let config = match std::env::var("USERBASE_CONFIG") {
        Ok(path) => AppConfig::load_file(&path)
            .with_context(|| format!("loading config file '{path}'"))?,
        Err(_) => {
            let env = std::env::var("USERBASE_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env).with_context(|| format!("loading config for env '{env}'"))?
        }
    };
    Ok(config)
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting userbase v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection ──────────────────────────────
    tracing::info!("Connecting to database...");
    let db_pool = DatabasePool::connect(&config.database)
        .await
        .context("database connection failed")?
        .into_pool();

    // ── Step 2: Migrations ───────────────────────────────────────
    tracing::info!("Running database migrations...");
    run_migrations(&db_pool).await.context("migration failed")?;
    tracing::info!("Database migrations complete");

    // ── Step 3: Serve until shutdown ─────────────────────────────
    userbase_api::run_server(config, db_pool).await?;

    tracing::info!("userbase shut down cleanly");
    Ok(())
}
