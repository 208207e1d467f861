//! Cross-origin access for browser clients of the auth and user routes.

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use userbase_core::config::app::CorsConfig;

/// Builds the CORS layer.
///
/// Browsers send bearer tokens in `Authorization` and JSON bodies, so those
/// two request headers are always allowed. Origins and methods come from
/// configuration; entries that do not parse are skipped with a warning.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(&config.allowed_origins))
        .allow_methods(allowed_methods(&config.allowed_methods))
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.max_age_seconds))
}

fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|o| o == "*") {
        return AllowOrigin::from(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        // An `Origin` header never carries a trailing slash.
        .map(|o| o.trim().trim_end_matches('/'))
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(parsed)
}

fn allowed_methods(methods: &[String]) -> Vec<Method> {
    methods
        .iter()
        .filter_map(|m| match m.trim().to_ascii_uppercase().parse::<Method>() {
            Ok(method) => Some(method),
            Err(_) => {
                warn!(method = %m, "Ignoring invalid CORS method");
                None
            }
        })
        .collect()
}
