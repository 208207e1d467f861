//! Auth handlers: login, refresh, logout, public keys, email verification
//! and password reset.

use axum::Json;
use axum::extract::{Query, State};
use axum_extra::extract::WithRejection;
use tracing::debug;
use validator::Validate;

use userbase_core::error::ErrorKind;

use crate::dto::request::{CodeQuery, ForgotPasswordRequest, LoginForm, ResetPasswordRequest};
use crate::dto::response::{ApiResponse, PublicKeyResponse, TokenResponse};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{BearerToken, ValidatedForm, ValidatedJson};
use crate::state::AppState;

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let pair = state.sessions.sign_in(&form.username, &form.password).await?;
    Ok(Json(pair.into()))
}

/// GET /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<TokenResponse>> {
    let pair = state.sessions.refresh(&token).await?;
    Ok(Json(pair.into()))
}

/// GET /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<ApiResponse<&'static str>>> {
    state.sessions.logout(&token).await?;
    Ok(Json(ApiResponse::ok("Logged out successfully")))
}

/// GET /auth/logoutall
pub async fn logout_all(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<ApiResponse<&'static str>>> {
    state.sessions.logout_all_with_token(&token).await?;
    Ok(Json(ApiResponse::ok("Logged out of all sessions")))
}

/// GET /auth/publickey
pub async fn public_key(State(state): State<AppState>) -> Json<PublicKeyResponse> {
    let keys = state.sessions.keys();
    Json(PublicKeyResponse {
        public_key_access_token: keys.access_public_key().to_string(),
        public_key_refresh_token: keys.refresh_public_key().to_string(),
    })
}

/// GET /auth/verifyemail?code=
pub async fn verify_email(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<CodeQuery>, ApiError>,
) -> ApiResult<Json<ApiResponse<&'static str>>> {
    query.validate()?;
    state.sessions.verify(&query.code).await?;
    Ok(Json(ApiResponse::ok("Email verified successfully")))
}

/// POST /auth/forgotpassword
///
/// Answers the same way whether or not the account exists.
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<Json<ApiResponse<&'static str>>> {
    match state.sessions.forgot_password(&req.email).await {
        Ok(()) => {}
        Err(e) if e.is(ErrorKind::NotFound) || e.is(ErrorKind::NotVerified) => {
            debug!(kind = %e.kind, "Password reset not started");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(Json(ApiResponse::ok(
        "You will receive a reset email if user with that email exist",
    )))
}

/// PATCH /auth/resetpassword?code=
pub async fn reset_password(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<CodeQuery>, ApiError>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Json<ApiResponse<&'static str>>> {
    query.validate()?;
    state
        .sessions
        .reset_password(&query.code, &req.new_password, &req.confirm_password)
        .await?;
    Ok(Json(ApiResponse::ok(
        "Password data updated successfully, please re-login",
    )))
}
