//! User handlers: self-service under `/user/me` and administration by id.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use userbase_entity::user::UpdateUser;
use userbase_service::{NewUser, Page};

use crate::dto::request::{CreateUserRequest, UpdatePasswordRequest, UpdateUserRequest};
use crate::dto::response::{ApiResponse, UserResponse};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{CurrentUser, SuperUser, ValidatedJson};
use crate::state::AppState;

type UserPath = WithRejection<Path<Uuid>, ApiError>;

fn profile_changes(req: UpdateUserRequest) -> UpdateUser {
    UpdateUser {
        name: req.name.filter(|name| !name.trim().is_empty()),
    }
}

/// GET /user/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::ok(user.into()))
}

/// PUT /user/me
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.user_service.update(user.id, profile_changes(req)).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PATCH /user/me/updatepass
pub async fn update_my_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<UpdatePasswordRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .sessions
        .update_password(
            user.id,
            &req.old_password,
            &req.new_password,
            &req.confirm_password,
        )
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// GET /user
pub async fn list(
    State(state): State<AppState>,
    _admin: SuperUser,
    WithRejection(Query(page), _): WithRejection<Query<Page>, ApiError>,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = state.user_service.list(page).await?;
    Ok(Json(ApiResponse::ok(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// POST /user
pub async fn create(
    State(state): State<AppState>,
    _admin: SuperUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .user_service
        .create(NewUser {
            name: req.name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            is_active: true,
            is_super_user: false,
            verified: false,
        })
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// GET /user/{id}
pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    WithRejection(Path(id), _): UserPath,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.user_service.get(id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /user/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: SuperUser,
    WithRejection(Path(id), _): UserPath,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.user_service.update(id, profile_changes(req)).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// DELETE /user/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: SuperUser,
    WithRejection(Path(id), _): UserPath,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.user_service.delete(id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PATCH /user/{id}/updatepass
pub async fn update_password(
    State(state): State<AppState>,
    _admin: SuperUser,
    WithRejection(Path(id), _): UserPath,
    ValidatedJson(req): ValidatedJson<UpdatePasswordRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .sessions
        .update_password(id, &req.old_password, &req.new_password, &req.confirm_password)
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// GET /user/{id}/logoutall
pub async fn logout_all(
    State(state): State<AppState>,
    _admin: SuperUser,
    WithRejection(Path(id), _): UserPath,
) -> ApiResult<Json<ApiResponse<&'static str>>> {
    state.sessions.logout_all(id).await?;
    Ok(Json(ApiResponse::ok("Logged out of all sessions")))
}
