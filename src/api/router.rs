use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, books, members, orders, rentals, venue};

/// 全エンドポイントのルーターを作成する
///
/// - /api/members, /api/books: 会員・書籍の管理
/// - /api/seats, /api/menus: 店舗設備の登録と参照
/// - /api/rentals: 貸出・返却
/// - /api/orders: 座席からの注文
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Members
        .route(
            "/api/members",
            get(members::list_members).post(members::register_member),
        )
        .route(
            "/api/members/:id",
            get(members::get_member)
                .put(members::update_member)
                .patch(members::patch_member)
                .delete(members::delete_member),
        )
        // Books
        .route("/api/books", get(books::list_books).post(books::register_book))
        .route(
            "/api/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .patch(books::patch_book)
                .delete(books::delete_book),
        )
        // Seats and menus
        .route("/api/seats", get(venue::list_seats).post(venue::register_seat))
        .route("/api/seats/:id", get(venue::get_seat))
        .route("/api/menus", get(venue::list_menus).post(venue::register_menu))
        .route("/api/menus/:id", get(venue::get_menu))
        // Rentals
        .route(
            "/api/rentals",
            get(rentals::list_rentals).post(rentals::create_rental),
        )
        .route(
            "/api/rentals/:id",
            get(rentals::get_rental).delete(rentals::delete_rental),
        )
        .route("/api/rentals/:id/return", post(rentals::return_rental))
        .route(
            "/api/rentals/member/:member_id",
            get(rentals::list_member_rentals),
        )
        // Orders
        .route("/api/orders", get(orders::list_orders).post(orders::create_order))
        .route(
            "/api/orders/:id",
            get(orders::get_order).delete(orders::delete_order),
        )
        .route("/api/orders/:id/status", post(orders::change_order_status))
        .route(
            "/api/orders/member/:member_id",
            get(orders::list_member_orders),
        )
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
