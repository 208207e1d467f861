//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Span, debug_span, info, warn};

/// Span opened by the trace layer for every request.
///
/// Records the path only. The query string can carry verification and reset
/// codes, so it never reaches a span field.
pub fn request_span<B>(request: &http::Request<B>) -> Span {
    debug_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        version = ?request.version(),
    )
}

/// Logs request method, path, status and duration.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "HTTP request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "HTTP request"
        );
    }

    response
}
