//! PostgreSQL-backed integration tests.
//!
//! Every test is ignored by default; run them with a disposable database:
//! `DATABASE_URL=postgres://... cargo test --test integration -- --ignored`

mod helpers;

mod account_flow_test;
mod job_queue_test;
mod repository_test;
