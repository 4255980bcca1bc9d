use crate::application::venue;
use crate::domain::{MenuId, SeatId};
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
    types::{MenuRequest, MenuResponse, SeatRequest, SeatResponse},
};

/// GET /api/seats - 座席一覧
pub async fn list_seats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SeatResponse>>, ApiError> {
    let seats = venue::list_seats(&state.service_deps).await?;
    Ok(Json(seats.into_iter().map(SeatResponse::from).collect()))
}

/// GET /api/seats/:id - 座席詳細
pub async fn get_seat(
    State(state): State<Arc<AppState>>,
    Path(seat_id): Path<Uuid>,
) -> Result<Json<SeatResponse>, ApiError> {
    let seat = venue::get_seat(&state.service_deps, SeatId::from_uuid(seat_id)).await?;
    Ok(Json(seat.into()))
}

/// POST /api/seats - 座席登録
pub async fn register_seat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeatRequest>,
) -> Result<(StatusCode, Json<SeatResponse>), ApiError> {
    let seat = venue::register_seat(&state.service_deps, req.seat_number, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(seat.into())))
}

/// GET /api/menus - メニュー一覧
pub async fn list_menus(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MenuResponse>>, ApiError> {
    let menus = venue::list_menu_items(&state.service_deps).await?;
    Ok(Json(menus.into_iter().map(MenuResponse::from).collect()))
}

/// GET /api/menus/:id - メニュー詳細
pub async fn get_menu(
    State(state): State<Arc<AppState>>,
    Path(menu_id): Path<Uuid>,
) -> Result<Json<MenuResponse>, ApiError> {
    let menu = venue::get_menu_item(&state.service_deps, MenuId::from_uuid(menu_id)).await?;
    Ok(Json(menu.into()))
}

/// POST /api/menus - メニュー登録
pub async fn register_menu(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MenuRequest>,
) -> Result<(StatusCode, Json<MenuResponse>), ApiError> {
    let menu =
        venue::register_menu_item(&state.service_deps, req.name, req.price, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(menu.into())))
}
