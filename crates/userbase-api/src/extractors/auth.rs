//! Bearer-token extractors.
//!
//! `BearerToken` only pulls the raw token out of the `Authorization` header;
//! the refresh endpoints hand it to the session manager as is. `CurrentUser`
//! additionally verifies it as an access token and loads the active user.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use userbase_core::error::AppError;
use userbase_entity::user::User;

use crate::error::ApiError;
use crate::state::AppState;

/// The raw token of an `Authorization: Bearer …` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        AppError::token_not_found("Not found token in header")
                    } else {
                        AppError::invalid_token("Malformed Authorization header")
                    }
                })?;

        let token = bearer.token().trim();
        if token.is_empty() {
            return Err(AppError::token_not_found("Not found token in header").into());
        }
        Ok(Self(token.to_string()))
    }
}

/// The authenticated, active user behind an access token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl std::ops::Deref for CurrentUser {
    type Target = User;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        let subject = state.sessions.parse_access_token(&token)?;
        let user = state.sessions.get_user(subject.user_id).await?;

        if !user.is_active {
            return Err(AppError::inactive_user("Inactive user").into());
        }

        Ok(Self(user))
    }
}

/// A `CurrentUser` that is also a super user.
#[derive(Debug, Clone)]
pub struct SuperUser(pub User);

impl std::ops::Deref for SuperUser {
    type Target = User;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for SuperUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.is_super_user {
            return Err(AppError::forbidden("The user doesn't have enough privileges").into());
        }

        Ok(Self(user))
    }
}
