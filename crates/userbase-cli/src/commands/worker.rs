//! Email worker commands.

use clap::{Args, Subcommand};
use tabled::Tabled;
use tokio::sync::watch;

use userbase_core::config::AppConfig;
use userbase_core::error::AppError;
use userbase_database::repositories::JobRepository;
use userbase_entity::job::JobStatus;
use userbase_worker::WorkerRunner;

use crate::output;

/// Arguments for worker commands
#[derive(Debug, Args)]
pub struct WorkerArgs {
    /// Worker subcommand
    #[command(subcommand)]
    pub command: WorkerCommand,
}

/// Worker subcommands
#[derive(Debug, Subcommand)]
pub enum WorkerCommand {
    /// Process queued emails until Ctrl+C
    Run,
    /// Show job counts per status
    Status,
}

#[derive(Debug, Tabled)]
struct StatusRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Jobs")]
    count: i64,
}

/// Execute worker commands
pub async fn execute(args: &WorkerArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let job_repo = JobRepository::new(pool);

    match &args.command {
        WorkerCommand::Run => {
            let runner = WorkerRunner::from_config(job_repo, &config.worker, &config.email)?;
            let (cancel_tx, cancel_rx) = watch::channel(false);

            tokio::spawn(async move {
                userbase_api::shutdown_signal().await;
                let _ = cancel_tx.send(true);
            });

            println!("Worker running, press Ctrl+C to stop.");
            runner.run(cancel_rx).await;
            output::print_success("Worker stopped.");
        }
        WorkerCommand::Status => {
            let mut counts = Vec::new();
            for status in JobStatus::ALL {
                counts.push((status, job_repo.count_by_status(status).await?));
            }

            let rows: Vec<StatusRow> = counts
                .iter()
                .map(|(status, count)| StatusRow {
                    status: status.to_string(),
                    count: *count,
                })
                .collect();
            let outstanding: i64 = counts
                .iter()
                .filter(|(status, _)| !status.is_terminal())
                .map(|(_, count)| count)
                .sum();

            println!("Email Queue Status:");
            output::print_table(&rows);
            output::print_kv("Outstanding", &outstanding.to_string());
            output::print_kv("Worker Enabled", &config.worker.enabled.to_string());
            output::print_kv("Concurrency", &config.worker.concurrency.to_string());

            let failed = counts
                .iter()
                .find(|(status, _)| *status == JobStatus::Failed)
                .map_or(0, |(_, count)| *count);
            if failed > 0 {
                output::print_warning(&format!("{failed} job(s) failed permanently"));
            }
        }
    }

    Ok(())
}
