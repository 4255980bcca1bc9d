use crate::application::{ApplicationError, ErrorKind};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    /// クエリ・パスの値が不正な場合
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError(ApplicationError::InvalidRequest(message.into()))
    }

    fn error_code(&self) -> &'static str {
        match &self.0 {
            ApplicationError::MemberNotFound(_) => "MEMBER_NOT_FOUND",
            ApplicationError::BookNotFound(_) => "BOOK_NOT_FOUND",
            ApplicationError::SeatNotFound(_) => "SEAT_NOT_FOUND",
            ApplicationError::MenuNotFound(_) => "MENU_NOT_FOUND",
            ApplicationError::RentalNotFound(_) => "RENTAL_NOT_FOUND",
            ApplicationError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            ApplicationError::BookNotAvailable { .. } => "BOOK_NOT_AVAILABLE",
            ApplicationError::RentalLimitExceeded { .. } => "RENTAL_LIMIT_EXCEEDED",
            ApplicationError::MemberHasOverdueRental => "MEMBER_HAS_OVERDUE_RENTAL",
            ApplicationError::AlreadyReturned => "ALREADY_RETURNED",
            ApplicationError::BookNotRented(_) => "BOOK_NOT_RENTED",
            ApplicationError::BookStatusManagedByRental(_) => "BOOK_STATUS_MANAGED_BY_RENTAL",
            ApplicationError::EmailAlreadyExists(_) => "EMAIL_ALREADY_EXISTS",
            ApplicationError::BookCodeAlreadyExists(_) => "BOOK_CODE_ALREADY_EXISTS",
            ApplicationError::SeatNumberAlreadyExists(_) => "SEAT_NUMBER_ALREADY_EXISTS",
            ApplicationError::InvalidRequest(_) => "INVALID_REQUEST",
            ApplicationError::Conflict(_) => "CONCURRENT_UPDATE",
            ApplicationError::RepositoryError(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            // 404 Not Found - 参照されたリソースが存在しない
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            // 422 Unprocessable Entity - ビジネスルール違反
            ErrorKind::InvalidState => StatusCode::UNPROCESSABLE_ENTITY,
            // 400 Bad Request - 入力値が不正
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            // 409 Conflict - 同時更新に負けた（再送可能）
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
        let message = match &self.0 {
            ApplicationError::RepositoryError(e) => {
                tracing::error!("Repository error: {}", e);
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            error: self.error_code().to_string(),
            message,
            retryable: self.0.is_retryable(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookStatus, RentalId};

    #[test]
    fn test_status_codes_follow_error_kind() {
        let cases = [
            (
                ApplicationError::RentalNotFound(RentalId::new()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApplicationError::BookNotRented(BookStatus::Available),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApplicationError::InvalidRequest("quantity".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApplicationError::Conflict("book".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                ApplicationError::RepositoryError("connection reset".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
