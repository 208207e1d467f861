//! Health check handler.

use axum::Json;
use axum::extract::State;

use userbase_core::traits::CacheProvider;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let cache_ok = state.cache.health_check().await.unwrap_or(false);

    let database = match &state.db_pool {
        Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => "connected",
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                "unavailable"
            }
        },
        None => "not_configured",
    };

    let healthy = cache_ok && database != "unavailable";

    Json(ApiResponse::ok(HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        cache: if cache_ok { "connected" } else { "unavailable" }.to_string(),
    }))
}
