//! Item routes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use common::models::{Item, ItemStatus, ModerationStatus, NewItem};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::MaybeCaller;
use crate::error::{ApiResult, Success};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<ItemStatus>,
}

#[derive(Deserialize)]
pub struct StatusBody {
    pub status: ModerationStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct RejectBody {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(serde::Serialize)]
pub struct UrgentResponse {
    pub success: bool,
    pub is_urgent: bool,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    Ok(Json(state.moderation.list_items(query.status).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Item>> {
    Ok(Json(state.moderation.get_item(id).await?))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Json(body): Json<NewItem>,
) -> ApiResult<Json<Item>> {
    let settings = state.moderation.settings_snapshot().await?;
    let item = state
        .moderation
        .submit_item(&settings, caller.as_ref(), body)
        .await?;
    Ok(Json(item))
}

pub async fn set_status(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> ApiResult<Json<Success>> {
    state
        .moderation
        .set_item_status(caller.as_ref(), id, body.status, body.reason.as_deref())
        .await?;
    Ok(Success::ok())
}

pub async fn approve(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Success>> {
    state.moderation.approve_item(caller.as_ref(), id).await?;
    Ok(Success::ok())
}

pub async fn reject(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
    Json(body): Json<RejectBody>,
) -> ApiResult<Json<Success>> {
    state
        .moderation
        .reject_item(caller.as_ref(), id, body.reason.as_deref())
        .await?;
    Ok(Success::ok())
}

pub async fn toggle_urgent(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UrgentResponse>> {
    let is_urgent = state.moderation.toggle_urgent(caller.as_ref(), id).await?;
    Ok(Json(UrgentResponse {
        success: true,
        is_urgent,
    }))
}

pub async fn mark_donated(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Success>> {
    state.moderation.mark_donated(caller.as_ref(), id).await?;
    Ok(Success::ok())
}

pub async fn soft_delete(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Success>> {
    state.moderation.soft_delete_item(caller.as_ref(), id).await?;
    Ok(Success::ok())
}

pub async fn hard_delete(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Success>> {
    state.moderation.hard_delete_item(caller.as_ref(), id).await?;
    Ok(Success::ok())
}
