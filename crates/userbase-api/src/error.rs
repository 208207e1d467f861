//! Maps domain `AppError` to HTTP responses.
//!
//! Every failure leaves the API as the same envelope:
//! `{"data": null, "is_success": false, "error": {status, status_text, msg}}`.

use axum::Json;
use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use userbase_core::error::{AppError, ErrorKind};

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An `AppError` on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Error details inside the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// HTTP status code.
    pub status: u16,
    /// Stable machine-readable error name.
    pub status_text: String,
    /// Human-readable message.
    pub msg: String,
}

/// Envelope returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub data: Option<()>,
    pub is_success: bool,
    pub error: ErrorBody,
}

/// Status code and `status_text` for an error kind.
pub fn status_of(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        ErrorKind::Validation => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
        ErrorKind::BadRequest => (StatusCode::BAD_REQUEST, "bad_request"),
        ErrorKind::WrongPassword => (StatusCode::UNAUTHORIZED, "wrong_password"),
        ErrorKind::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_jwt_token"),
        ErrorKind::InvalidClaims => (StatusCode::UNAUTHORIZED, "invalid_jwt_claims"),
        ErrorKind::TokenNotFound => (StatusCode::UNAUTHORIZED, "token_not_found"),
        ErrorKind::RevokedToken => (StatusCode::UNAUTHORIZED, "not_found_refresh_token_redis"),
        ErrorKind::AlreadyVerified => (StatusCode::UNAUTHORIZED, "user_already_verified"),
        ErrorKind::NotVerified => (StatusCode::UNAUTHORIZED, "user_not_verified"),
        ErrorKind::InactiveUser => (StatusCode::FORBIDDEN, "inactive_user"),
        ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "not_enough_privileges"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "email_exists"),
        ErrorKind::Timeout => (StatusCode::REQUEST_TIMEOUT, "request_timeout"),
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Cache
        | ErrorKind::Configuration
        | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "internal_server_error"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, status_text) = status_of(self.0.kind);

        // Internal details stay in the log.
        let msg = if status.is_server_error() {
            tracing::error!(kind = %self.0.kind, error = %self.0.message, "Internal server error");
            "Internal server error".to_string()
        } else {
            self.0.message
        };

        let body = ApiErrorResponse {
            data: None,
            is_success: false,
            error: ErrorBody {
                status: status.as_u16(),
                status_text: status_text.to_string(),
                msg,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        Self(AppError::validation(err.to_string()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => Self(AppError::validation(e.body_text())),
            other => Self(AppError::bad_request(other.body_text())),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        match rejection {
            FormRejection::FailedToDeserializeFormBody(e) => {
                Self(AppError::validation(e.body_text()))
            }
            other => Self(AppError::bad_request(other.body_text())),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(AppError::validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(AppError::validation(rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_kinds_map_to_401() {
        for kind in [
            ErrorKind::WrongPassword,
            ErrorKind::InvalidToken,
            ErrorKind::InvalidClaims,
            ErrorKind::TokenNotFound,
            ErrorKind::RevokedToken,
            ErrorKind::AlreadyVerified,
            ErrorKind::NotVerified,
        ] {
            assert_eq!(status_of(kind).0, StatusCode::UNAUTHORIZED, "{kind}");
        }
    }

    #[test]
    fn test_status_texts() {
        assert_eq!(
            status_of(ErrorKind::RevokedToken).1,
            "not_found_refresh_token_redis"
        );
        assert_eq!(status_of(ErrorKind::Forbidden).1, "not_enough_privileges");
        assert_eq!(status_of(ErrorKind::Conflict).1, "email_exists");
        assert_eq!(status_of(ErrorKind::Timeout).0, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            status_of(ErrorKind::Cache),
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_server_error")
        );
    }

    #[tokio::test]
    async fn test_internal_message_is_hidden() {
        let response = ApiError(AppError::database("password=hunter2 rejected")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["is_success"], false);
        assert!(body["data"].is_null());
        assert_eq!(body["error"]["msg"], "Internal server error");
    }
}
