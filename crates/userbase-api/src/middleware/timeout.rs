//! Request deadline.
//!
//! `tower_http`'s timeout layer answers with a bare 408; `envelope_timeout`
//! turns that into the usual error envelope. The handler future is dropped
//! on timeout, which cancels any store call it was waiting on.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower_http::timeout::TimeoutLayer;

use userbase_core::error::AppError;

use crate::error::ApiError;

/// Answers 408 once a request runs longer than `seconds`.
#[allow(deprecated)]
pub fn build_timeout_layer(seconds: u64) -> TimeoutLayer {
    TimeoutLayer::new(Duration::from_secs(seconds.max(1)))
}

/// Rewrites a timeout response into the JSON error envelope.
pub async fn envelope_timeout(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        ApiError(AppError::timeout("Request timed out")).into_response()
    } else {
        response
    }
}
