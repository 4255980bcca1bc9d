use super::BookStatus;

/// 書籍の貸出状態遷移のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookStatusError {
    /// 貸出可能ではない（現在の状態）
    NotAvailable(BookStatus),
    /// 貸出中ではない（現在の状態）
    NotRented(BookStatus),
    /// RENTEDに関わる変更は貸出処理でのみ可能
    ManagedByRental(BookStatus),
}

/// 貸出のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RentBookError {
    /// 書籍が貸出可能ではない
    BookNotAvailable(BookStatus),
    /// 貸出料金が保存できる金額を超える
    FeeOutOfRange,
    /// 返却期限が日時の範囲を超える
    DueDateOutOfRange,
}

impl From<BookStatusError> for RentBookError {
    fn from(err: BookStatusError) -> Self {
        match err {
            BookStatusError::NotAvailable(status)
            | BookStatusError::NotRented(status)
            | BookStatusError::ManagedByRental(status) => RentBookError::BookNotAvailable(status),
        }
    }
}

/// 注文のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOrderError {
    /// 合計金額が保存できる金額を超える
    AmountOutOfRange,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnRentalError {
    /// 既に返却済み
    AlreadyReturned,
    /// 対象の書籍が貸出中ではない
    BookNotRented(BookStatus),
}
