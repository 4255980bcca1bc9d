use crate::domain::{
    BookId, BookStatus, MemberId, MenuId, OrderId, QuantityError, RentalDaysError, RentalId,
    SeatId,
};
use thiserror::Error;

/// エラーの分類
///
/// API層でのステータスコード決定とリトライ可否の判断に使用される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 参照されたIDが存在しない
    NotFound,
    /// ビジネスルール違反
    InvalidState,
    /// 入力値が不正
    InvalidInput,
    /// 同時更新の競合に負けた（リトライ可能）
    Conflict,
    /// 永続化層の障害
    Internal,
}

/// アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Member not found with id: {0}")]
    MemberNotFound(MemberId),

    #[error("Book not found with id: {0}")]
    BookNotFound(BookId),

    #[error("Seat not found with id: {0}")]
    SeatNotFound(SeatId),

    #[error("Menu not found with id: {0}")]
    MenuNotFound(MenuId),

    #[error("Rental not found with id: {0}")]
    RentalNotFound(RentalId),

    #[error("Order not found with id: {0}")]
    OrderNotFound(OrderId),

    /// 書籍がAVAILABLEではない
    #[error("Book is not available: {title}")]
    BookNotAvailable { title: String },

    /// 貸出上限（3冊）に達している
    #[error("Maximum rental limit exceeded. Current: {current}, Max: {max}")]
    RentalLimitExceeded { current: usize, max: usize },

    /// 会員に延滞中の貸出がある
    #[error("Member has overdue rentals. Please return them first.")]
    MemberHasOverdueRental,

    #[error("Book has already been returned.")]
    AlreadyReturned,

    /// 返却時に書籍がRENTEDではなかった
    #[error("Book is not rented (current status: {0})")]
    BookNotRented(BookStatus),

    /// RENTEDに関わる状態変更を書籍管理から行おうとした
    #[error("Book lending status is managed by rentals (current status: {0})")]
    BookStatusManagedByRental(BookStatus),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Book code already exists: {0}")]
    BookCodeAlreadyExists(String),

    #[error("Seat number already exists: {0}")]
    SeatNumberAlreadyExists(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 同時に行われた別のリクエストが先に書籍の状態を変更した
    #[error("Concurrent update conflict: {0}")]
    Conflict(String),

    #[error("Repository error")]
    RepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApplicationError::MemberNotFound(_)
            | ApplicationError::BookNotFound(_)
            | ApplicationError::SeatNotFound(_)
            | ApplicationError::MenuNotFound(_)
            | ApplicationError::RentalNotFound(_)
            | ApplicationError::OrderNotFound(_) => ErrorKind::NotFound,

            ApplicationError::BookNotAvailable { .. }
            | ApplicationError::RentalLimitExceeded { .. }
            | ApplicationError::MemberHasOverdueRental
            | ApplicationError::AlreadyReturned
            | ApplicationError::BookNotRented(_)
            | ApplicationError::BookStatusManagedByRental(_)
            | ApplicationError::EmailAlreadyExists(_)
            | ApplicationError::BookCodeAlreadyExists(_)
            | ApplicationError::SeatNumberAlreadyExists(_) => ErrorKind::InvalidState,

            ApplicationError::InvalidRequest(_) => ErrorKind::InvalidInput,

            ApplicationError::Conflict(_) => ErrorKind::Conflict,

            ApplicationError::RepositoryError(_) => ErrorKind::Internal,
        }
    }

    /// 同じリクエストを再送すれば成功し得るか
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

impl From<RentalDaysError> for ApplicationError {
    fn from(err: RentalDaysError) -> Self {
        ApplicationError::InvalidRequest(err.to_string())
    }
}

impl From<QuantityError> for ApplicationError {
    fn from(err: QuantityError) -> Self {
        ApplicationError::InvalidRequest(err.to_string())
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ApplicationError>;
