//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use sqlx::PgPool;

use userbase_auth::AuthSessionManager;
use userbase_cache::provider::CacheManager;
use userbase_core::config::AppConfig;
use userbase_service::{ItemService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Every field is a
/// shared handle, so cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool; absent when the stores are in memory.
    pub db_pool: Option<PgPool>,
    /// Cache manager (Redis or in-memory)
    pub cache: CacheManager,

    // ── Auth ─────────────────────────────────────────────────
    /// Session lifecycle manager
    pub sessions: AuthSessionManager,

    // ── Services ─────────────────────────────────────────────
    pub user_service: Arc<UserService>,
    pub item_service: Arc<ItemService>,
}
