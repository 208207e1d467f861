//! Application builder: wires router, middleware and state into an Axum app,
//! and runs the server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::PgPool;
use tokio::sync::watch;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use userbase_auth::{AuthKeys, AuthSessionManager};
use userbase_cache::provider::CacheManager;
use userbase_core::config::AppConfig;
use userbase_core::error::{AppError, ErrorKind};
use userbase_core::result::AppResult;
use userbase_core::traits::EmailDispatcher;
use userbase_database::repositories::{ItemRepository, JobRepository, UserRepository};
use userbase_service::{ItemService, UserService};
use userbase_worker::{EmailDistributor, JobQueue, WorkerRunner};

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_span;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
}

/// Runs the userbase server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> AppResult<()> {
    tracing::info!("Starting userbase server...");

    // ── Step 1: Initialize cache ─────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache");
    let cache = CacheManager::new(&config.cache).await?;

    // ── Step 2: Load signing keys ────────────────────────────────
    let keys = Arc::new(AuthKeys::from_config(&config.auth)?);

    // ── Step 3: Initialize repositories ──────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let item_repo = Arc::new(ItemRepository::new(db_pool.clone()));
    let job_repo = JobRepository::new(db_pool.clone());

    // ── Step 4: Email queue ──────────────────────────────────────
    let api_queue = JobQueue::new(job_repo.clone(), "api");
    let dispatcher: Arc<dyn EmailDispatcher> = Arc::new(EmailDistributor::new(api_queue));

    // ── Step 5: Auth and services ────────────────────────────────
    let sessions = AuthSessionManager::new(
        user_repo.clone(),
        cache.clone(),
        keys,
        Arc::clone(&dispatcher),
        config.auth.clone(),
        config.email.clone(),
    );
    let user_service = Arc::new(UserService::new(
        user_repo,
        sessions.clone(),
        dispatcher,
        config.email.clone(),
        config.first_super_user.clone(),
    ));
    let item_service = Arc::new(ItemService::new(item_repo));

    // ── Step 6: Shutdown channel & embedded worker ───────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker_handle = if config.worker.enabled {
        let runner = WorkerRunner::from_config(job_repo, &config.worker, &config.email)?;
        Some(tokio::spawn(async move {
            runner.run(shutdown_rx).await;
        }))
    } else {
        None
    };

    // ── Step 7: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let app_state = AppState {
        config: Arc::new(config),
        db_pool: Some(db_pool),
        cache,
        sessions,
        user_service,
        item_service,
    };
    let app = build_app(app_state);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;

    tracing::info!(addr = %addr, "userbase server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    if let Some(handle) = worker_handle {
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Embedded worker did not stop within the grace period");
        }
    }

    tracing::info!("userbase server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
