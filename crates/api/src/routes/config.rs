//! Point value and CMS settings routes

use axum::{
    extract::{Path, State},
    Json,
};
use common::models::{PointValue, Setting};
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::MaybeCaller;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PointValueBody {
    pub points: f64,
}

#[derive(Deserialize)]
pub struct SettingBody {
    pub value: serde_json::Value,
}

pub async fn list_point_values(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PointValue>>> {
    Ok(Json(state.moderation.list_point_values().await?))
}

pub async fn upsert_point_value(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(key): Path<String>,
    Json(body): Json<PointValueBody>,
) -> ApiResult<Json<PointValue>> {
    let value = state
        .moderation
        .upsert_point_value(caller.as_ref(), &key, body.points)
        .await?;
    Ok(Json(value))
}

pub async fn list_settings(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Setting>>> {
    Ok(Json(state.moderation.list_settings().await?))
}

pub async fn upsert_setting(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(key): Path<String>,
    Json(body): Json<SettingBody>,
) -> ApiResult<Json<Setting>> {
    let setting = state
        .moderation
        .upsert_setting(caller.as_ref(), &key, body.value)
        .await?;
    Ok(Json(setting))
}
