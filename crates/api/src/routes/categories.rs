//! Category routes

use axum::{
    extract::{Path, State},
    Json,
};
use common::models::{Category, CategoryTree, SubCategory};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::MaybeCaller;
use crate::error::{ApiResult, Success};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NameBody {
    pub name: String,
}

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<CategoryTree>>> {
    Ok(Json(state.moderation.list_categories().await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Json(body): Json<NameBody>,
) -> ApiResult<Json<Category>> {
    let category = state
        .moderation
        .create_category(caller.as_ref(), &body.name)
        .await?;
    Ok(Json(category))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
    Json(body): Json<NameBody>,
) -> ApiResult<Json<Category>> {
    let category = state
        .moderation
        .update_category(caller.as_ref(), id, &body.name)
        .await?;
    Ok(Json(category))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Success>> {
    state.moderation.delete_category(caller.as_ref(), id).await?;
    Ok(Success::ok())
}

pub async fn create_sub(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(category_id): Path<Uuid>,
    Json(body): Json<NameBody>,
) -> ApiResult<Json<SubCategory>> {
    let sub = state
        .moderation
        .create_sub_category(caller.as_ref(), category_id, &body.name)
        .await?;
    Ok(Json(sub))
}

pub async fn update_sub(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
    Json(body): Json<NameBody>,
) -> ApiResult<Json<SubCategory>> {
    let sub = state
        .moderation
        .update_sub_category(caller.as_ref(), id, &body.name)
        .await?;
    Ok(Json(sub))
}

pub async fn delete_sub(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Success>> {
    state
        .moderation
        .delete_sub_category(caller.as_ref(), id)
        .await?;
    Ok(Success::ok())
}
