use crate::application::book::{self, BookFilter};
use crate::domain::{BookId, BookStatus};
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
    types::{BookRequest, BookResponse, ListBooksQuery, PatchBookRequest, parse_filter},
};

/// GET /api/books - 書籍一覧
///
/// クエリパラメータ:
/// - status: AVAILABLE, RENTED, LOST, DAMAGED（オプション）
/// - genre: ジャンル（オプション）
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListBooksQuery>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let filter = BookFilter {
        status: parse_filter::<BookStatus>(query.status.as_deref())?,
        genre: query.genre,
    };

    let books = book::list_books(&state.service_deps, filter).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// GET /api/books/:id - 書籍詳細
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = book::get_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(Json(book.into()))
}

/// POST /api/books - 書籍登録
pub async fn register_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = book::register_book(&state.service_deps, req.into(), Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

/// PUT /api/books/:id - 書籍情報の全体更新
///
/// 貸出状態（RENTED）は貸出処理が管理するため、ここでは変更できない。
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
    Json(req): Json<BookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = book::update_book(
        &state.service_deps,
        BookId::from_uuid(book_id),
        req.into(),
        Utc::now(),
    )
    .await?;
    Ok(Json(book.into()))
}

/// PATCH /api/books/:id - 書籍情報の部分更新
pub async fn patch_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
    Json(req): Json<PatchBookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = book::patch_book(
        &state.service_deps,
        BookId::from_uuid(book_id),
        req.into(),
        Utc::now(),
    )
    .await?;
    Ok(Json(book.into()))
}

/// DELETE /api/books/:id - 書籍削除
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    book::delete_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
