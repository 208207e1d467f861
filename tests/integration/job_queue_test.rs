//! Email jobs through the PostgreSQL queue and the worker loop.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tokio::sync::watch;

use userbase_core::config::worker::QueueWeight;
use userbase_core::config::{EmailConfig, WorkerConfig};
use userbase_core::traits::{EmailDispatcher, EmailMessage, EnqueueOptions};
use userbase_database::repositories::JobRepository;
use userbase_entity::job::JobStatus;
use userbase_worker::jobs::SEND_EMAIL_JOB;
use userbase_worker::{EmailDistributor, JobQueue, WorkerRunner};

use crate::helpers::{migrated_pool, test_config, unique_queue};

fn message(to: &str) -> EmailMessage {
    EmailMessage {
        from: "no-reply@example.com".to_string(),
        to: to.to_string(),
        subject: "Your account verification code".to_string(),
        body_html: "<p>123456</p>".to_string(),
        body_plain: "123456".to_string(),
    }
}

fn options(queue: &str) -> EnqueueOptions {
    EnqueueOptions {
        max_retry: 2,
        delay: Duration::ZERO,
        queue: queue.to_string(),
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_claim_retry_and_complete() {
    let pool = migrated_pool(&test_config()).await;
    let repo = JobRepository::new(pool);
    let queue_name = unique_queue();
    let queue = JobQueue::new(repo.clone(), "queue-test");

    EmailDistributor::new(queue.clone())
        .enqueue(message("ann@example.com"), options(&queue_name))
        .await
        .unwrap();

    let job = queue.dequeue(&[&queue_name]).await.unwrap().unwrap();
    assert_eq!(job.job_type, SEND_EMAIL_JOB);
    assert_eq!(job.status, JobStatus::Running);
    assert_eq!(job.attempts, 1);
    assert_eq!(job.max_attempts, 3);
    assert_eq!(job.worker_id.as_deref(), Some("queue-test"));

    // Nothing else is due while the job waits for its retry.
    queue
        .retry_at(job.id, "relay unavailable", Utc::now() + TimeDelta::hours(1))
        .await
        .unwrap();
    assert!(queue.dequeue(&[&queue_name]).await.unwrap().is_none());

    let pending = repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(pending.status, JobStatus::Pending);
    assert_eq!(pending.error_message.as_deref(), Some("relay unavailable"));

    queue.complete(job.id).await.unwrap();
    let done = repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(done.status, JobStatus::Completed);
    assert!(done.error_message.is_none());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_delayed_job_is_not_claimed_early() {
    let pool = migrated_pool(&test_config()).await;
    let queue_name = unique_queue();
    let queue = JobQueue::new(JobRepository::new(pool), "queue-test");

    let mut delayed = options(&queue_name);
    delayed.delay = Duration::from_secs(3600);
    EmailDistributor::new(queue.clone())
        .enqueue(message("bob@example.com"), delayed)
        .await
        .unwrap();

    assert!(queue.dequeue(&[&queue_name]).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_worker_delivers_queued_email() {
    let pool = migrated_pool(&test_config()).await;
    let repo = JobRepository::new(pool);
    let queue_name = unique_queue();

    let job = JobQueue::new(repo.clone(), "api")
        .enqueue(
            userbase_worker::queue::email_job(
                &message("cy@example.com"),
                &options(&queue_name),
                Utc::now(),
            )
            .unwrap(),
        )
        .await
        .unwrap();

    let worker_config = WorkerConfig {
        enabled: true,
        concurrency: 1,
        poll_interval_seconds: 1,
        queues: vec![QueueWeight {
            name: queue_name.clone(),
            weight: 1,
        }],
    };
    let runner =
        WorkerRunner::from_config(repo.clone(), &worker_config, &EmailConfig::default()).unwrap();

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { runner.run(cancel_rx).await });

    let mut status = JobStatus::Pending;
    for _ in 0..50 {
        status = repo.find_by_id(job.id).await.unwrap().unwrap().status;
        if status.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    cancel_tx.send(true).unwrap();
    handle.await.unwrap();

    assert_eq!(status, JobStatus::Completed);
}
