//! Database migration management commands.

use clap::{Args, Subcommand};

use userbase_core::config::AppConfig;
use userbase_core::error::AppError;
use userbase_database::migration::{run_migrations, verify_schema};

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Check that the users, items and jobs tables match the code
    Check,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            run_migrations(&pool).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Check => {
            verify_schema(&pool).await?;
            output::print_success("Schema matches the users, items and jobs tables.");
        }
    }

    Ok(())
}
