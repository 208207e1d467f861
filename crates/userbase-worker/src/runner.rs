//! Worker runner: polls the queues and executes claimed jobs.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tokio::sync::{Semaphore, watch};
use tokio::time;
use tracing::{debug, error, info, trace, warn};

use userbase_core::config::worker::QueueWeight;
use userbase_core::config::{EmailConfig, WorkerConfig};
use userbase_core::result::AppResult;
use userbase_database::repositories::JobRepository;
use userbase_entity::job::Job;
use uuid::Uuid;

use crate::executor::JobExecutor;
use crate::jobs::default_executor;
use crate::queue::JobQueue;

const BASE_BACKOFF_SECS: i64 = 10;
const MAX_BACKOFF_SECS: i64 = 3600;
/// Running jobs older than this at startup belong to a dead worker.
const STALE_AFTER_MINUTES: i64 = 15;
const SHUTDOWN_DRAIN: Duration = Duration::from_secs(30);

/// Delay before retry number `attempt` (1-based): 10s doubling up to 1h.
pub fn backoff(attempt: i32) -> TimeDelta {
    let exponent = attempt.saturating_sub(1).clamp(0, 20) as u32;
    let secs = BASE_BACKOFF_SECS
        .saturating_mul(2_i64.saturating_pow(exponent))
        .min(MAX_BACKOFF_SECS);
    TimeDelta::seconds(secs)
}

/// Smooth weighted round-robin over queue names.
///
/// Every call yields all queues; the first one rotates so that, over time,
/// each queue leads in proportion to its weight.
#[derive(Debug)]
pub struct WeightedQueues {
    entries: Vec<(String, i64, i64)>,
}

impl WeightedQueues {
    pub fn new(queues: &[QueueWeight]) -> Self {
        let entries = queues
            .iter()
            .filter(|q| q.weight > 0)
            .map(|q| (q.name.clone(), i64::from(q.weight), 0))
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queue names in the order the next poll should try them.
    pub fn next_order(&mut self) -> Vec<String> {
        let total: i64 = self.entries.iter().map(|(_, w, _)| *w).sum();
        let mut lead = 0;
        for i in 0..self.entries.len() {
            self.entries[i].2 += self.entries[i].1;
            if self.entries[i].2 > self.entries[lead].2 {
                lead = i;
            }
        }

        let mut order = Vec::with_capacity(self.entries.len());
        if let Some(entry) = self.entries.get_mut(lead) {
            entry.2 -= total;
            order.push(entry.0.clone());
        }
        let mut rest: Vec<&(String, i64, i64)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != lead)
            .map(|(_, e)| e)
            .collect();
        rest.sort_by(|a, b| b.1.cmp(&a.1));
        order.extend(rest.into_iter().map(|e| e.0.clone()));
        order
    }
}

/// Polls the job queue and runs jobs on a bounded pool of tasks.
#[derive(Debug)]
pub struct WorkerRunner {
    queue: Arc<JobQueue>,
    executor: Arc<JobExecutor>,
    config: WorkerConfig,
    queues: Mutex<WeightedQueues>,
}

impl WorkerRunner {
    pub fn new(queue: Arc<JobQueue>, executor: Arc<JobExecutor>, config: WorkerConfig) -> Self {
        let queues = Mutex::new(WeightedQueues::new(&config.queues));
        Self {
            queue,
            executor,
            config,
            queues,
        }
    }

    /// Runner over `repo` with a fresh worker id and the built-in handlers.
    pub fn from_config(
        repo: JobRepository,
        config: &WorkerConfig,
        email: &EmailConfig,
    ) -> AppResult<Self> {
        let worker_id = format!("worker-{}", &Uuid::new_v4().simple().to_string()[..8]);
        let queue = Arc::new(JobQueue::new(repo, worker_id));
        let executor = Arc::new(default_executor(email)?);
        Ok(Self::new(queue, executor, config.clone()))
    }

    /// Run until `cancel` flips to `true`, then drain in-flight jobs.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let worker_id = self.queue.worker_id().to_string();
        info!(
            worker_id = %worker_id,
            concurrency = self.config.concurrency,
            poll_interval = self.config.poll_interval_seconds,
            handlers = ?self.executor.registered_types(),
            "Worker started"
        );

        let no_queues = self.queues.lock().map(|q| q.is_empty()).unwrap_or(true);
        if no_queues {
            error!(worker_id = %worker_id, "No queue has a positive weight, worker not started");
            return;
        }

        let stale_before = Utc::now() - TimeDelta::minutes(STALE_AFTER_MINUTES);
        match self.queue.requeue_stale(stale_before).await {
            Ok(0) => {}
            Ok(n) => warn!(count = n, "Requeued jobs abandoned by a previous worker"),
            Err(e) => error!(error = %e, "Failed to requeue stale jobs"),
        }

        let concurrency = self.config.concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds.max(1));

        loop {
            if *cancel.borrow() {
                break;
            }

            let claimed = tokio::select! {
                _ = cancel.changed() => break,
                claimed = self.poll_and_execute(&semaphore) => claimed,
            };

            if claimed {
                continue;
            }

            tokio::select! {
                _ = cancel.changed() => break,
                _ = time::sleep(poll_interval) => {}
            }
        }

        info!(worker_id = %worker_id, "Worker waiting for in-flight jobs");
        let permits = u32::try_from(concurrency).unwrap_or(u32::MAX);
        if time::timeout(SHUTDOWN_DRAIN, semaphore.acquire_many(permits))
            .await
            .is_err()
        {
            warn!(worker_id = %worker_id, "Worker stopped with jobs still running");
        }
        info!(worker_id = %worker_id, "Worker shut down");
    }

    /// Claim one job and spawn it. Returns whether a job was claimed.
    async fn poll_and_execute(&self, semaphore: &Arc<Semaphore>) -> bool {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            return false;
        };

        let order = match self.queues.lock() {
            Ok(mut queues) => queues.next_order(),
            Err(_) => return false,
        };
        let order: Vec<&str> = order.iter().map(String::as_str).collect();

        match self.queue.dequeue(&order).await {
            Ok(Some(job)) => {
                let queue = Arc::clone(&self.queue);
                let executor = Arc::clone(&self.executor);
                tokio::spawn(async move {
                    let _permit = permit;
                    process(&queue, &executor, job).await;
                });
                true
            }
            Ok(None) => {
                trace!("No jobs due");
                false
            }
            Err(e) => {
                error!(error = %e, "Failed to dequeue job");
                false
            }
        }
    }
}

async fn process(queue: &JobQueue, executor: &JobExecutor, job: Job) {
    debug!(
        job_id = %job.id,
        job_type = %job.job_type,
        attempt = job.attempts,
        max_attempts = job.max_attempts,
        "Processing job"
    );

    let outcome = match executor.execute(&job).await {
        Ok(()) => queue.complete(job.id).await,
        Err(e) if e.is_retryable() && job.can_retry() => {
            let run_at = Utc::now() + backoff(job.attempts);
            warn!(job_id = %job.id, error = %e, %run_at, "Job failed, retry scheduled");
            queue.retry_at(job.id, &e.to_string(), run_at).await
        }
        Err(e) => {
            error!(job_id = %job.id, error = %e, "Job failed permanently");
            queue.fail(job.id, &e.to_string()).await
        }
    };

    if let Err(e) = outcome {
        error!(job_id = %job.id, error = %e, "Failed to record job outcome");
    }
}
