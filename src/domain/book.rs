use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BookId, BookStatusError};

/// 1冊あたりの1日の貸出料金（指定がない場合）
pub const DEFAULT_RENTAL_PRICE: i64 = 1000;

/// 巻数の上限
pub const MAX_VOLUME: u32 = 9999;

/// 書籍の貸出状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    /// 貸出可能
    #[default]
    Available,
    /// 貸出中
    Rented,
    /// 紛失
    Lost,
    /// 破損
    Damaged,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "AVAILABLE",
            BookStatus::Rented => "RENTED",
            BookStatus::Lost => "LOST",
            BookStatus::Damaged => "DAMAGED",
        }
    }
}

impl std::str::FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(BookStatus::Available),
            "RENTED" => Ok(BookStatus::Rented),
            "LOST" => Ok(BookStatus::Lost),
            "DAMAGED" => Ok(BookStatus::Damaged),
            _ => Err(format!("Invalid book status: {}", s)),
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 書籍の物理的な状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookCondition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl BookCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookCondition::Excellent => "EXCELLENT",
            BookCondition::Good => "GOOD",
            BookCondition::Fair => "FAIR",
            BookCondition::Poor => "POOR",
        }
    }
}

impl std::str::FromStr for BookCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXCELLENT" => Ok(BookCondition::Excellent),
            "GOOD" => Ok(BookCondition::Good),
            "FAIR" => Ok(BookCondition::Fair),
            "POOR" => Ok(BookCondition::Poor),
            _ => Err(format!("Invalid book condition: {}", s)),
        }
    }
}

/// 書籍（漫画本1冊）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: BookId,

    // 書誌情報
    /// 書籍コード（例: MH-001-001）。一意。
    pub code: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub volume: u32,
    pub genre: String,

    // 貸出管理
    /// 1日あたりの貸出料金
    pub rental_price: Decimal,
    pub status: BookStatus,
    pub condition: BookCondition,
    /// 書架の位置（例: A-01）
    pub location: Option<String>,
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 書籍の登録・全体更新に使う項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    pub code: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub volume: u32,
    pub genre: String,
    pub rental_price: Decimal,
    pub status: BookStatus,
    pub condition: BookCondition,
    pub location: Option<String>,
    pub note: Option<String>,
}

/// 書籍の部分更新。Noneの項目は変更しない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub code: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub volume: Option<u32>,
    pub genre: Option<String>,
    pub rental_price: Option<Decimal>,
    pub status: Option<BookStatus>,
    pub condition: Option<BookCondition>,
    pub location: Option<String>,
    pub note: Option<String>,
}

/// 純粋関数：書籍を登録する
pub fn register_book(details: BookDetails, registered_at: DateTime<Utc>) -> Book {
    Book {
        book_id: BookId::new(),
        code: details.code,
        title: details.title,
        author: details.author,
        publisher: details.publisher,
        volume: details.volume,
        genre: details.genre,
        rental_price: details.rental_price,
        status: details.status,
        condition: details.condition,
        location: details.location,
        note: details.note,
        created_at: registered_at,
        updated_at: registered_at,
    }
}

/// 純粋関数：書誌情報を全体更新する
///
/// 貸出状態の変更は`ensure_status_editable`のルールに従う。
/// `rental_open`は書籍にRETURNED以外の貸出が残っているか。
pub fn replace_details(
    book: &Book,
    details: BookDetails,
    rental_open: bool,
    updated_at: DateTime<Utc>,
) -> Result<Book, BookStatusError> {
    ensure_status_editable(book.status, details.status, rental_open)?;

    Ok(Book {
        code: details.code,
        title: details.title,
        author: details.author,
        publisher: details.publisher,
        volume: details.volume,
        genre: details.genre,
        rental_price: details.rental_price,
        status: details.status,
        condition: details.condition,
        location: details.location,
        note: details.note,
        updated_at,
        ..book.clone()
    })
}

/// 純粋関数：指定された項目のみ更新する
pub fn apply_patch(
    book: &Book,
    patch: BookPatch,
    rental_open: bool,
    updated_at: DateTime<Utc>,
) -> Result<Book, BookStatusError> {
    if let Some(status) = patch.status {
        ensure_status_editable(book.status, status, rental_open)?;
    }

    let current = book.clone();
    Ok(Book {
        code: patch.code.unwrap_or(current.code),
        title: patch.title.unwrap_or(current.title),
        author: patch.author.unwrap_or(current.author),
        publisher: patch.publisher.unwrap_or(current.publisher),
        volume: patch.volume.unwrap_or(current.volume),
        genre: patch.genre.unwrap_or(current.genre),
        rental_price: patch.rental_price.unwrap_or(current.rental_price),
        status: patch.status.unwrap_or(current.status),
        condition: patch.condition.unwrap_or(current.condition),
        location: patch.location.or(current.location),
        note: patch.note.or(current.note),
        updated_at,
        ..current
    })
}

/// 書籍管理からの状態変更ルール
///
/// RENTEDへの遷移は貸出処理だけが行う。RENTEDからの遷移は、
/// 貸出記録が削除されて未返却の貸出が残っていない場合に限り許可する。
fn ensure_status_editable(
    current: BookStatus,
    requested: BookStatus,
    rental_open: bool,
) -> Result<(), BookStatusError> {
    if current == requested {
        return Ok(());
    }
    if requested == BookStatus::Rented || (current == BookStatus::Rented && rental_open) {
        return Err(BookStatusError::ManagedByRental(current));
    }
    Ok(())
}

/// 貸出記録のないRENTEDの書籍を書籍管理から解放する更新か
pub fn releases_rented(current: &Book, updated: &Book) -> bool {
    current.status == BookStatus::Rented && updated.status != BookStatus::Rented
}

// ============================================================================
// 貸出可否ゲート
// ============================================================================

/// 純粋関数：貸出可能か
pub fn is_available(book: &Book) -> bool {
    book.status == BookStatus::Available
}

/// 純粋関数：AVAILABLE → RENTED
pub fn mark_rented(book: &Book, at: DateTime<Utc>) -> Result<Book, BookStatusError> {
    if !is_available(book) {
        return Err(BookStatusError::NotAvailable(book.status));
    }

    Ok(Book {
        status: BookStatus::Rented,
        updated_at: at,
        ..book.clone()
    })
}

/// 純粋関数：RENTED → AVAILABLE
///
/// 既にAVAILABLEの書籍に対する呼び出しもエラーとして返し、
/// 呼び出し側（返却処理）で扱う。
pub fn mark_available(book: &Book, at: DateTime<Utc>) -> Result<Book, BookStatusError> {
    if book.status != BookStatus::Rented {
        return Err(BookStatusError::NotRented(book.status));
    }

    Ok(Book {
        status: BookStatus::Available,
        updated_at: at,
        ..book.clone()
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    pub(crate) fn sample_details() -> BookDetails {
        BookDetails {
            code: "MH-001-001".to_string(),
            title: "One Piece".to_string(),
            author: "Eiichiro Oda".to_string(),
            publisher: "Shueisha".to_string(),
            volume: 1,
            genre: "Action".to_string(),
            rental_price: Decimal::new(DEFAULT_RENTAL_PRICE, 0),
            status: BookStatus::Available,
            condition: BookCondition::Good,
            location: Some("A-01".to_string()),
            note: None,
        }
    }

    #[test]
    fn test_register_book_copies_details() {
        let now = Utc::now();
        let book = register_book(sample_details(), now);

        assert_eq!(book.code, "MH-001-001");
        assert_eq!(book.status, BookStatus::Available);
        assert_eq!(book.rental_price, Decimal::new(1000, 0));
        assert_eq!(book.created_at, now);
    }

    #[test]
    fn test_is_available_only_for_available_status() {
        let mut book = register_book(sample_details(), Utc::now());
        assert!(is_available(&book));

        for status in [BookStatus::Rented, BookStatus::Lost, BookStatus::Damaged] {
            book.status = status;
            assert!(!is_available(&book));
        }
    }

    #[test]
    fn test_mark_rented_success() {
        let now = Utc::now();
        let book = register_book(sample_details(), now);
        let later = now + Duration::seconds(1);

        let rented = mark_rented(&book, later).unwrap();

        assert_eq!(rented.status, BookStatus::Rented);
        assert_eq!(rented.updated_at, later);
        assert_eq!(rented.book_id, book.book_id);
    }

    #[test]
    fn test_mark_rented_fails_when_not_available() {
        let mut book = register_book(sample_details(), Utc::now());
        book.status = BookStatus::Lost;

        let result = mark_rented(&book, Utc::now());
        assert_eq!(
            result.unwrap_err(),
            BookStatusError::NotAvailable(BookStatus::Lost)
        );
    }

    #[test]
    fn test_mark_available_success() {
        let now = Utc::now();
        let book = register_book(sample_details(), now);
        let rented = mark_rented(&book, now).unwrap();

        let released = mark_available(&rented, now).unwrap();
        assert_eq!(released.status, BookStatus::Available);
    }

    #[test]
    fn test_mark_available_fails_when_already_available() {
        let book = register_book(sample_details(), Utc::now());

        let result = mark_available(&book, Utc::now());
        assert_eq!(
            result.unwrap_err(),
            BookStatusError::NotRented(BookStatus::Available)
        );
    }

    #[test]
    fn test_replace_details_can_mark_lost() {
        let book = register_book(sample_details(), Utc::now());
        let details = BookDetails {
            status: BookStatus::Lost,
            ..sample_details()
        };

        let updated = replace_details(&book, details, false, Utc::now()).unwrap();
        assert_eq!(updated.status, BookStatus::Lost);
    }

    #[test]
    fn test_replace_details_rejects_rented_status() {
        let book = register_book(sample_details(), Utc::now());
        let details = BookDetails {
            status: BookStatus::Rented,
            ..sample_details()
        };

        let result = replace_details(&book, details, false, Utc::now());
        assert_eq!(
            result.unwrap_err(),
            BookStatusError::ManagedByRental(BookStatus::Available)
        );
    }

    #[test]
    fn test_apply_patch_keeps_rented_status_when_untouched() {
        let now = Utc::now();
        let rented = mark_rented(&register_book(sample_details(), now), now).unwrap();

        let patched = apply_patch(
            &rented,
            BookPatch {
                location: Some("B-03".to_string()),
                ..BookPatch::default()
            },
            true,
            now,
        )
        .unwrap();

        assert_eq!(patched.status, BookStatus::Rented);
        assert_eq!(patched.location.as_deref(), Some("B-03"));
        assert_eq!(patched.title, rented.title);
    }

    #[test]
    fn test_apply_patch_cannot_release_rented_book() {
        let now = Utc::now();
        let rented = mark_rented(&register_book(sample_details(), now), now).unwrap();

        let result = apply_patch(
            &rented,
            BookPatch {
                status: Some(BookStatus::Available),
                ..BookPatch::default()
            },
            true,
            now,
        );
        assert_eq!(
            result.unwrap_err(),
            BookStatusError::ManagedByRental(BookStatus::Rented)
        );
    }

    #[test]
    fn test_apply_patch_releases_rented_book_without_open_rental() {
        let now = Utc::now();
        let rented = mark_rented(&register_book(sample_details(), now), now).unwrap();

        let released = apply_patch(
            &rented,
            BookPatch {
                status: Some(BookStatus::Lost),
                ..BookPatch::default()
            },
            false,
            now,
        )
        .unwrap();

        assert_eq!(released.status, BookStatus::Lost);
        assert!(releases_rented(&rented, &released));
        assert!(!releases_rented(&released, &released));
    }

    #[test]
    fn test_replace_details_releases_rented_book_without_open_rental() {
        let now = Utc::now();
        let rented = mark_rented(&register_book(sample_details(), now), now).unwrap();
        let details = BookDetails {
            status: BookStatus::Available,
            condition: BookCondition::Poor,
            ..sample_details()
        };

        let released = replace_details(&rented, details.clone(), false, now).unwrap();
        assert_eq!(released.status, BookStatus::Available);
        assert_eq!(released.condition, BookCondition::Poor);

        let result = replace_details(&rented, details, true, now);
        assert_eq!(
            result.unwrap_err(),
            BookStatusError::ManagedByRental(BookStatus::Rented)
        );
    }
}
