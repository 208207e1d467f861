//! Background email delivery for userbase.
//!
//! This crate provides:
//! - `EmailDistributor`, the `EmailDispatcher` that writes `send_email` jobs
//! - A job queue over the `jobs` table, claimed with `FOR UPDATE SKIP LOCKED`
//! - A worker runner that polls weighted queues and retries with backoff
//! - Mail transports: log-only and an HTTP relay

pub mod executor;
pub mod jobs;
pub mod mail;
pub mod queue;
pub mod runner;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use jobs::default_executor;
pub use mail::{DeliveryError, MailTransport};
pub use queue::{EmailDistributor, JobQueue};
pub use runner::WorkerRunner;
