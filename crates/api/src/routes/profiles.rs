//! Profile routes: bans, roles and point corrections

use axum::{
    extract::{Path, State},
    Json,
};
use common::models::{Profile, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::MaybeCaller;
use crate::error::{ApiResult, Success};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BanBody {
    pub banned: bool,
}

#[derive(Deserialize)]
pub struct RoleBody {
    pub role: Role,
}

#[derive(Deserialize)]
pub struct AwardBody {
    pub amount: f64,
}

#[derive(Deserialize)]
pub struct CorrectionBody {
    pub points: f64,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub success: bool,
    pub points: f64,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
) -> ApiResult<Json<Vec<Profile>>> {
    Ok(Json(state.moderation.list_profiles(caller.as_ref()).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Profile>> {
    Ok(Json(state.moderation.get_profile(id).await?))
}

pub async fn set_ban(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
    Json(body): Json<BanBody>,
) -> ApiResult<Json<Success>> {
    state
        .moderation
        .set_ban(caller.as_ref(), id, body.banned)
        .await?;
    Ok(Success::ok())
}

pub async fn set_role(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
    Json(body): Json<RoleBody>,
) -> ApiResult<Json<Success>> {
    state
        .moderation
        .set_role(caller.as_ref(), id, body.role)
        .await?;
    Ok(Success::ok())
}

pub async fn award_points(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
    Json(body): Json<AwardBody>,
) -> ApiResult<Json<BalanceResponse>> {
    let points = state
        .moderation
        .award_points(caller.as_ref(), id, body.amount)
        .await?;
    Ok(Json(BalanceResponse {
        success: true,
        points,
    }))
}

pub async fn correct_points(
    State(state): State<Arc<AppState>>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<Uuid>,
    Json(body): Json<CorrectionBody>,
) -> ApiResult<Json<BalanceResponse>> {
    let profile = state
        .moderation
        .correct_points(caller.as_ref(), id, body.points)
        .await?;
    Ok(Json(BalanceResponse {
        success: true,
        points: profile.points,
    }))
}
