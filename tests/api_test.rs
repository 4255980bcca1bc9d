use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use manga_cafe::api::handlers::AppState;
use manga_cafe::api::router::create_router;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

mod common;

// ============================================================================
// APIテスト用のヘルパー関数
// ============================================================================

/// インメモリストアを使ったルーター
fn setup_app() -> axum::Router {
    let app_state = Arc::new(AppState {
        service_deps: common::in_memory_deps(),
    });
    create_router(app_state)
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// 金額は文字列としてシリアライズされるため、Decimalとして比較する
fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

async fn create_member(app: &axum::Router, email: &str, tier: &str) -> String {
    let response = send(
        app,
        "POST",
        "/api/members",
        Some(json!({ "name": "Test Member", "email": email, "tier": tier })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["member_id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_book(app: &axum::Router, code: &str) -> String {
    let response = send(
        app,
        "POST",
        "/api/books",
        Some(json!({
            "code": code,
            "title": "Slam Dunk 1",
            "author": "Inoue Takehiko",
            "publisher": "Shueisha",
            "volume": 1,
            "genre": "Sports"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["book_id"]
        .as_str()
        .unwrap()
        .to_string()
}

// ============================================================================
// テスト
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let response = send(&app, "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_book_defaults_are_applied() {
    let app = setup_app();
    let book_id = create_book(&app, "MH-100-001").await;

    let response = send(&app, "GET", &format!("/api/books/{}", book_id), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let book = json_body(response).await;
    assert_eq!(book["status"], "AVAILABLE");
    assert_eq!(book["condition"], "GOOD");
    assert_eq!(decimal(&book["rental_price"]), Decimal::new(1000, 0));
}

#[tokio::test]
async fn test_rental_lifecycle() {
    let app = setup_app();
    let member_id = create_member(&app, "gold@example.com", "GOLD").await;
    let book_id = create_book(&app, "MH-100-002").await;

    // Step 1: 貸出（POST /api/rentals）
    let response = send(
        &app,
        "POST",
        "/api/rentals",
        Some(json!({ "member_id": member_id, "book_id": book_id })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let rental = json_body(response).await;
    assert_eq!(rental["status"], "ACTIVE");
    assert_eq!(rental["member_tier"], "GOLD");
    assert_eq!(rental["book_code"], "MH-100-002");
    assert_eq!(decimal(&rental["base_fee"]), Decimal::new(7000, 0));
    assert_eq!(decimal(&rental["discounted_fee"]), Decimal::new(6300, 0));
    let rental_id = rental["rental_id"].as_str().unwrap().to_string();

    // Step 2: 書籍はRENTEDになっている
    let response = send(&app, "GET", &format!("/api/books/{}", book_id), None).await;
    assert_eq!(json_body(response).await["status"], "RENTED");

    // Step 3: 同じ書籍は貸し出せない
    let other_member = create_member(&app, "other@example.com", "BRONZE").await;
    let response = send(
        &app,
        "POST",
        "/api/rentals",
        Some(json!({ "member_id": other_member, "book_id": book_id })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = json_body(response).await;
    assert_eq!(error["error"], "BOOK_NOT_AVAILABLE");
    assert_eq!(error["retryable"], false);

    // Step 4: 返却（POST /api/rentals/:id/return）
    let uri = format!("/api/rentals/{}/return", rental_id);
    let response = send(&app, "POST", &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let returned = json_body(response).await;
    assert_eq!(returned["status"], "RETURNED");
    assert!(returned["returned_at"].is_string());

    // Step 5: 2回目の返却はエラー
    let response = send(&app, "POST", &uri, None).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["error"], "ALREADY_RETURNED");

    // Step 6: 会員の貸出履歴
    let response = send(
        &app,
        "GET",
        &format!("/api/rentals/member/{}", member_id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let history = json_body(response).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rental_days_must_be_positive() {
    let app = setup_app();
    let member_id = create_member(&app, "zero@example.com", "BRONZE").await;
    let book_id = create_book(&app, "MH-100-003").await;

    let response = send(
        &app,
        "POST",
        "/api/rentals",
        Some(json!({ "member_id": member_id, "book_id": book_id, "rental_days": 0 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "INVALID_REQUEST");

    // 書籍の状態は変わっていない
    let response = send(&app, "GET", &format!("/api/books/{}", book_id), None).await;
    assert_eq!(json_body(response).await["status"], "AVAILABLE");
}

#[tokio::test]
async fn test_unknown_rental_returns_not_found() {
    let app = setup_app();

    let response = send(
        &app,
        "GET",
        &format!("/api/rentals/{}", uuid::Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error = json_body(response).await;
    assert_eq!(error["error"], "RENTAL_NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_status_filter_is_bad_request() {
    let app = setup_app();

    let response = send(&app, "GET", "/api/books?status=BOGUS", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/api/orders?status=BOGUS", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_update_cannot_mark_book_rented() {
    let app = setup_app();
    let book_id = create_book(&app, "MH-100-004").await;

    let response = send(
        &app,
        "PUT",
        &format!("/api/books/{}", book_id),
        Some(json!({
            "code": "MH-100-004",
            "title": "Slam Dunk 1",
            "author": "Inoue Takehiko",
            "publisher": "Shueisha",
            "volume": 1,
            "genre": "Sports",
            "status": "RENTED"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json_body(response).await["error"],
        "BOOK_STATUS_MANAGED_BY_RENTAL"
    );
}

#[tokio::test]
async fn test_order_lifecycle() {
    let app = setup_app();
    let member_id = create_member(&app, "vip@example.com", "VIP").await;

    let response = send(&app, "POST", "/api/seats", Some(json!({ "seat_number": "A-01" }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let seat_id = json_body(response).await["seat_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = send(
        &app,
        "POST",
        "/api/menus",
        Some(json!({ "name": "Iced Americano", "price": "4500" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let menu_id = json_body(response).await["menu_id"]
        .as_str()
        .unwrap()
        .to_string();

    // Step 1: 注文（POST /api/orders）
    let response = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({
            "member_id": member_id,
            "seat_id": seat_id,
            "menu_id": menu_id,
            "quantity": 3
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = json_body(response).await;
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["seat_number"], "A-01");
    assert_eq!(decimal(&order["total_price"]), Decimal::new(13500, 0));
    assert_eq!(decimal(&order["discounted_price"]), Decimal::new(11475, 0));
    let order_id = order["order_id"].as_str().unwrap().to_string();

    // Step 2: 状態変更（POST /api/orders/:id/status）
    let response = send(
        &app,
        "POST",
        &format!("/api/orders/{}/status", order_id),
        Some(json!({ "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "COMPLETED");

    // Step 3: 状態で絞り込み
    let response = send(&app, "GET", "/api/orders?status=COMPLETED", None).await;
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);
    let response = send(&app, "GET", "/api/orders?status=PENDING", None).await;
    assert!(json_body(response).await.as_array().unwrap().is_empty());

    // Step 4: 削除
    let response = send(&app, "DELETE", &format!("/api/orders/{}", order_id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = send(&app, "GET", &format!("/api/orders/{}", order_id), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_zero_quantity_order_is_bad_request() {
    let app = setup_app();

    let response = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({
            "member_id": uuid::Uuid::new_v4(),
            "seat_id": uuid::Uuid::new_v4(),
            "menu_id": uuid::Uuid::new_v4(),
            "quantity": 0
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rental_days_beyond_limit_is_bad_request() {
    let app = setup_app();
    let member_id = create_member(&app, "forever@example.com", "VIP").await;
    let book_id = create_book(&app, "MH-100-005").await;

    let response = send(
        &app,
        "POST",
        "/api/rentals",
        Some(json!({ "member_id": member_id, "book_id": book_id, "rental_days": 4294967295u32 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = json_body(response).await;
    assert_eq!(error["error"], "INVALID_REQUEST");
    assert_eq!(error["retryable"], false);

    let response = send(&app, "GET", &format!("/api/books/{}", book_id), None).await;
    assert_eq!(json_body(response).await["status"], "AVAILABLE");
}

#[tokio::test]
async fn test_oversized_order_and_prices_are_bad_request() {
    let app = setup_app();

    // 数量の上限超過
    let response = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({
            "member_id": uuid::Uuid::new_v4(),
            "seat_id": uuid::Uuid::new_v4(),
            "menu_id": uuid::Uuid::new_v4(),
            "quantity": 100000
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // NUMERIC(12,2)に収まらない貸出料金
    let response = send(
        &app,
        "POST",
        "/api/books",
        Some(json!({
            "code": "MH-100-006",
            "title": "Slam Dunk 2",
            "author": "Inoue Takehiko",
            "publisher": "Shueisha",
            "volume": 2,
            "genre": "Sports",
            "rental_price": "100000000000"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // NUMERIC(12,2)に収まらないメニュー単価
    let response = send(
        &app,
        "POST",
        "/api/menus",
        Some(json!({ "name": "Gold leaf parfait", "price": "10000000000" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/api/books", None).await;
    assert!(json_body(response).await.as_array().unwrap().is_empty());
}
