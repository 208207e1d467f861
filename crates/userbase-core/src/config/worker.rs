//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the server process also runs the worker.
    #[serde(default)]
    pub enabled: bool,
    /// Number of concurrent job processing tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in seconds between job queue polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Queue names with their relative weights.
    #[serde(default = "default_queues")]
    pub queues: Vec<QueueWeight>,
}

/// A named queue and its share of dequeue attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueWeight {
    /// Queue name.
    pub name: String,
    /// Relative weight (higher is polled first more often).
    pub weight: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            concurrency: default_concurrency(),
            poll_interval_seconds: default_poll_interval(),
            queues: default_queues(),
        }
    }
}

/// Queue for jobs that must go out first (account emails).
pub const QUEUE_CRITICAL: &str = "critical";
/// Queue for everything else.
pub const QUEUE_DEFAULT: &str = "default";

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval() -> u64 {
    2
}

fn default_queues() -> Vec<QueueWeight> {
    vec![
        QueueWeight {
            name: QUEUE_CRITICAL.to_string(),
            weight: 10,
        },
        QueueWeight {
            name: QUEUE_DEFAULT.to_string(),
            weight: 5,
        },
    ]
}
