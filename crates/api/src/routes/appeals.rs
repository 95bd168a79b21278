//! Appeal routes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use common::models::{Appeal, AppealStatus, AppealUpdate, NewAppeal};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::MaybeCaller;
use crate::error::{ApiResult, Success};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<AppealStatus>,
}

#[derive(Deserialize)]
pub struct StatusBody {
    pub status: AppealStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Appeal>>> {
    Ok(Json(state.moderation.list_appeals(query.status).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Appeal>> {
    Ok(Json(state.moderation.get_appeal(id).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Json(body): Json<NewAppeal>,
) -> ApiResult<Json<Appeal>> {
    let settings = state.moderation.settings_snapshot().await?;
    let appeal = state
        .moderation
        .create_appeal(&settings, caller.as_ref(), body)
        .await?;
    Ok(Json(appeal))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
    Json(body): Json<AppealUpdate>,
) -> ApiResult<Json<Appeal>> {
    let appeal = state
        .moderation
        .update_appeal(caller.as_ref(), id, body)
        .await?;
    Ok(Json(appeal))
}

pub async fn set_status(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> ApiResult<Json<Success>> {
    state
        .moderation
        .set_appeal_status(caller.as_ref(), id, body.status, body.reason.as_deref())
        .await?;
    Ok(Success::ok())
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Success>> {
    state.moderation.delete_appeal(caller.as_ref(), id).await?;
    Ok(Success::ok())
}
