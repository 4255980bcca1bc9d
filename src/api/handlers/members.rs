use crate::application::member;
use crate::domain::MemberId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::AppState;
use crate::api::{
    error::ApiError,
    types::{MemberResponse, PatchMemberRequest, RegisterMemberRequest, UpdateMemberRequest},
};

/// GET /api/members - 会員一覧
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = member::list_members(&state.service_deps).await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// GET /api/members/:id - 会員詳細
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member = member::get_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(Json(member.into()))
}

/// POST /api/members - 会員登録
///
/// メールアドレスが登録済みの場合は422。
pub async fn register_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let (profile, tier) = req.into_parts();
    let member = member::register_member(&state.service_deps, profile, tier, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(member.into())))
}

/// PUT /api/members/:id - 会員情報の全体更新
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
    Json(req): Json<UpdateMemberRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member = member::update_member(
        &state.service_deps,
        MemberId::from_uuid(member_id),
        req.into(),
        Utc::now(),
    )
    .await?;
    Ok(Json(member.into()))
}

/// PATCH /api/members/:id - 会員情報の部分更新
pub async fn patch_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
    Json(req): Json<PatchMemberRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member = member::patch_member(
        &state.service_deps,
        MemberId::from_uuid(member_id),
        req.into(),
        Utc::now(),
    )
    .await?;
    Ok(Json(member.into()))
}

/// DELETE /api/members/:id - 会員削除
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    member::delete_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
