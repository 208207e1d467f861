//! Start the userbase server.

use clap::Args;

use userbase_core::config::AppConfig;
use userbase_core::error::AppError;
use userbase_database::migration::run_migrations;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Run database migrations before serving
    #[arg(long)]
    pub auto_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }

    println!("Starting userbase server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);

    let pool = super::create_db_pool(&config).await?;

    if args.auto_migrate || config.server.migrate_on_start {
        println!("Running database migrations...");
        run_migrations(&pool).await?;
        println!("  Migrations applied successfully.");
    }

    userbase_api::run_server(config, pool).await
}
