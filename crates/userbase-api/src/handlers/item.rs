//! Item handlers. Non-owners other than super users get `Forbidden`.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use userbase_entity::item::{CreateItem, UpdateItem};
use userbase_service::Page;

use crate::dto::request::{CreateItemRequest, UpdateItemRequest};
use crate::dto::response::{ApiResponse, ItemResponse};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::state::AppState;

type ItemPath = WithRejection<Path<Uuid>, ApiError>;

/// GET /item
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Query(page), _): WithRejection<Query<Page>, ApiError>,
) -> ApiResult<Json<ApiResponse<Vec<ItemResponse>>>> {
    let items = state.item_service.list(&user, page).await?;
    Ok(Json(ApiResponse::ok(
        items.into_iter().map(ItemResponse::from).collect(),
    )))
}

/// POST /item
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateItemRequest>,
) -> ApiResult<Json<ApiResponse<ItemResponse>>> {
    let item = state
        .item_service
        .create_with_owner(
            &user,
            CreateItem {
                title: req.title,
                description: req.description,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(item.into())))
}

/// GET /item/{id}
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): ItemPath,
) -> ApiResult<Json<ApiResponse<ItemResponse>>> {
    let item = state.item_service.get(&user, id).await?;
    Ok(Json(ApiResponse::ok(item.into())))
}

/// PUT /item/{id}
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): ItemPath,
    ValidatedJson(req): ValidatedJson<UpdateItemRequest>,
) -> ApiResult<Json<ApiResponse<ItemResponse>>> {
    let changes = UpdateItem {
        title: req.title,
        description: req.description,
    };
    let item = state.item_service.update(&user, id, changes).await?;
    Ok(Json(ApiResponse::ok(item.into())))
}

/// DELETE /item/{id}
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): ItemPath,
) -> ApiResult<Json<ApiResponse<ItemResponse>>> {
    let item = state.item_service.delete(&user, id).await?;
    Ok(Json(ApiResponse::ok(item.into())))
}
