use crate::application::rental;
use crate::domain::{MemberId, RentalId, commands::ReturnRental};
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
    types::{RentalRequest, RentalResponse},
};

// ============================================================================
// Command handlers (POST/DELETE)
// ============================================================================

/// POST /api/rentals - 書籍を貸し出す
///
/// 強制されるビジネスルール:
/// - 会員・書籍が存在すること
/// - 書籍がAVAILABLEであること
/// - 会員の貸出中の冊数が上限（3冊）未満であること
/// - 会員に延滞中の貸出がないこと
///
/// 同時に同じ書籍が貸し出された場合は409（retryable）。
pub async fn create_rental(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RentalRequest>,
) -> Result<(StatusCode, Json<RentalResponse>), ApiError> {
    let cmd = req.to_command(Utc::now())?;
    let details = rental::rent_book(&state.service_deps, cmd).await?;
    Ok((StatusCode::CREATED, Json(details.into())))
}

/// POST /api/rentals/:id/return - 書籍を返却する
///
/// 延滞中の貸出も返却できる。返却済みの場合は422。
pub async fn return_rental(
    State(state): State<Arc<AppState>>,
    Path(rental_id): Path<Uuid>,
) -> Result<Json<RentalResponse>, ApiError> {
    let cmd = ReturnRental {
        rental_id: RentalId::from_uuid(rental_id),
        returned_at: Utc::now(),
    };
    let details = rental::return_rental(&state.service_deps, cmd).await?;
    Ok(Json(details.into()))
}

/// DELETE /api/rentals/:id - 貸出記録を削除する
pub async fn delete_rental(
    State(state): State<Arc<AppState>>,
    Path(rental_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    rental::delete_rental(&state.service_deps, RentalId::from_uuid(rental_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /api/rentals - 全貸出
pub async fn list_rentals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RentalResponse>>, ApiError> {
    let rentals = rental::list_rentals(&state.service_deps, Utc::now()).await?;
    Ok(Json(rentals.into_iter().map(RentalResponse::from).collect()))
}

/// GET /api/rentals/:id - 貸出詳細
pub async fn get_rental(
    State(state): State<Arc<AppState>>,
    Path(rental_id): Path<Uuid>,
) -> Result<Json<RentalResponse>, ApiError> {
    let details =
        rental::get_rental(&state.service_deps, RentalId::from_uuid(rental_id), Utc::now())
            .await?;
    Ok(Json(details.into()))
}

/// GET /api/rentals/member/:member_id - 会員の貸出履歴
pub async fn list_member_rentals(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<Vec<RentalResponse>>, ApiError> {
    let rentals = rental::list_member_rentals(
        &state.service_deps,
        MemberId::from_uuid(member_id),
        Utc::now(),
    )
    .await?;
    Ok(Json(rentals.into_iter().map(RentalResponse::from).collect()))
}
