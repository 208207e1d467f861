//! # userbase-api
//!
//! HTTP API layer for userbase built on Axum.
//!
//! Provides the auth, user, item and health endpoints, the bearer-token
//! extractors, request validation, middleware (request logging, CORS,
//! timeouts) and the mapping from `AppError` to the JSON error envelope.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server, shutdown_signal};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
