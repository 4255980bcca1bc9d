use crate::application::order;
use crate::domain::{MemberId, OrderId, OrderStatus, commands::ChangeOrderStatus};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::AppState;
use crate::api::{
    error::ApiError,
    types::{ListOrdersQuery, OrderRequest, OrderResponse, OrderStatusRequest, parse_filter},
};

/// POST /api/orders - 注文する
///
/// 合計はメニュー単価 × 数量、会員ランクの割引を適用する。
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let cmd = req.to_command(Utc::now())?;
    let details = order::place_order(&state.service_deps, cmd).await?;
    Ok((StatusCode::CREATED, Json(details.into())))
}

/// POST /api/orders/:id/status - 注文状態を変更する
pub async fn change_order_status(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<OrderStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let cmd = ChangeOrderStatus {
        order_id: OrderId::from_uuid(order_id),
        status: req.status,
        changed_at: Utc::now(),
    };
    let details = order::change_order_status(&state.service_deps, cmd).await?;
    Ok(Json(details.into()))
}

/// DELETE /api/orders/:id - 注文を削除する
pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    order::delete_order(&state.service_deps, OrderId::from_uuid(order_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/orders - 注文一覧
///
/// クエリパラメータ:
/// - status: PENDING, PREPARING, COMPLETED, CANCELLED（オプション）
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let status = parse_filter::<OrderStatus>(query.status.as_deref())?;
    let orders = order::list_orders(&state.service_deps, status).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// GET /api/orders/:id - 注文詳細
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    let details = order::get_order(&state.service_deps, OrderId::from_uuid(order_id)).await?;
    Ok(Json(details.into()))
}

/// GET /api/orders/member/:member_id - 会員の注文履歴
pub async fn list_member_orders(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders =
        order::list_member_orders(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}
