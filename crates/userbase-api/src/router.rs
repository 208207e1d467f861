//! Route definitions for the userbase HTTP API.
//!
//! Routes are grouped by resource. The router receives `AppState` and passes
//! it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post},
};

use userbase_core::error::AppError;

use crate::error::ApiError;
use crate::handlers;
use crate::middleware::logging::request_logging;
use crate::middleware::timeout::{build_timeout_layer, envelope_timeout};
use crate::state::AppState;

/// Build the router with every route, the request deadline and request
/// logging.
pub fn build_router(state: AppState) -> Router {
    let timeout = state.config.server.request_timeout_seconds;

    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(item_routes())
        .route("/health", get(handlers::health::health))
        .fallback(route_not_found)
        .layer(build_timeout_layer(timeout))
        .layer(axum_middleware::map_response(envelope_timeout))
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// Login, token rotation, logout, verification and password reset
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", get(handlers::auth::refresh))
        .route("/auth/logout", get(handlers::auth::logout))
        .route("/auth/logoutall", get(handlers::auth::logout_all))
        .route("/auth/publickey", get(handlers::auth::public_key))
        .route("/auth/verifyemail", get(handlers::auth::verify_email))
        .route("/auth/forgotpassword", post(handlers::auth::forgot_password))
        .route("/auth/resetpassword", patch(handlers::auth::reset_password))
}

/// Self-service and super-user administration
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user/me",
            get(handlers::user::me).put(handlers::user::update_me),
        )
        .route(
            "/user/me/updatepass",
            patch(handlers::user::update_my_password),
        )
        .route(
            "/user",
            get(handlers::user::list).post(handlers::user::create),
        )
        .route(
            "/user/{id}",
            get(handlers::user::get)
                .put(handlers::user::update)
                .delete(handlers::user::delete),
        )
        .route(
            "/user/{id}/updatepass",
            patch(handlers::user::update_password),
        )
        .route("/user/{id}/logoutall", get(handlers::user::logout_all))
}

/// Owned items
fn item_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/item",
            get(handlers::item::list).post(handlers::item::create),
        )
        .route(
            "/item/{id}",
            get(handlers::item::get)
                .put(handlers::item::update)
                .delete(handlers::item::delete),
        )
}

async fn route_not_found() -> ApiError {
    ApiError(AppError::not_found("Route not found"))
}
