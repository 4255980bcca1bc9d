use crate::domain::{
    self, Book, BookId, BookStatus, BookStatusError,
    book::{BookDetails, BookPatch, MAX_VOLUME},
    discount,
};
use crate::ports::WriteOutcome;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::super::{ApplicationError, Result, ServiceDependencies};

/// 書籍一覧の絞り込み条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub status: Option<BookStatus>,
    pub genre: Option<String>,
}

/// 書籍を登録する
///
/// ビジネスルール：
/// - 書籍コードは未使用であること
/// - 貸出料金は0以上、巻数は1以上
pub async fn register_book(
    deps: &ServiceDependencies,
    details: BookDetails,
    registered_at: DateTime<Utc>,
) -> Result<Book> {
    validate_price(details.rental_price)?;
    validate_volume(details.volume)?;
    if details.status == BookStatus::Rented {
        return Err(ApplicationError::InvalidRequest(
            "A new book cannot be registered as RENTED".to_string(),
        ));
    }
    ensure_code_unused(deps, &details.code).await?;

    let book = domain::book::register_book(details, registered_at);

    deps.books
        .save(&book)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(book_id = %book.book_id, code = %book.code, "book registered");
    Ok(book)
}

pub async fn get_book(deps: &ServiceDependencies, book_id: BookId) -> Result<Book> {
    load_book(deps, book_id).await
}

/// 書籍一覧を取得する
///
/// 状態とジャンルの両方を指定した場合は両方に一致するもの。
pub async fn list_books(deps: &ServiceDependencies, filter: BookFilter) -> Result<Vec<Book>> {
    let books = match (filter.status, filter.genre.as_deref()) {
        (Some(status), genre) => {
            let books = deps
                .books
                .find_by_status(status)
                .await
                .map_err(ApplicationError::RepositoryError)?;
            match genre {
                Some(genre) => books.into_iter().filter(|b| b.genre == genre).collect(),
                None => books,
            }
        }
        (None, Some(genre)) => deps
            .books
            .find_by_genre(genre)
            .await
            .map_err(ApplicationError::RepositoryError)?,
        (None, None) => deps
            .books
            .list()
            .await
            .map_err(ApplicationError::RepositoryError)?,
    };

    Ok(books)
}

/// 書籍情報を全体更新する
///
/// RENTEDの書籍は、未返却の貸出が残っていない場合に限り別の状態へ変更できる。
pub async fn update_book(
    deps: &ServiceDependencies,
    book_id: BookId,
    details: BookDetails,
    updated_at: DateTime<Utc>,
) -> Result<Book> {
    validate_price(details.rental_price)?;
    validate_volume(details.volume)?;

    let book = load_book(deps, book_id).await?;
    if details.code != book.code {
        ensure_code_unused(deps, &details.code).await?;
    }

    let rental_open = has_open_rental(deps, &book).await?;
    let updated = domain::book::replace_details(&book, details, rental_open, updated_at)
        .map_err(from_status_error)?;
    persist(deps, &book, &updated).await?;

    tracing::info!(book_id = %book_id, status = %updated.status, "book updated");
    Ok(updated)
}

/// 書籍情報を部分更新する
///
/// 状態の変更は`update_book`と同じ規則に従う。
pub async fn patch_book(
    deps: &ServiceDependencies,
    book_id: BookId,
    patch: BookPatch,
    updated_at: DateTime<Utc>,
) -> Result<Book> {
    if let Some(price) = patch.rental_price {
        validate_price(price)?;
    }
    if let Some(volume) = patch.volume {
        validate_volume(volume)?;
    }

    let book = load_book(deps, book_id).await?;
    if let Some(code) = patch.code.as_deref() {
        if code != book.code {
            ensure_code_unused(deps, code).await?;
        }
    }

    let rental_open = has_open_rental(deps, &book).await?;
    let updated = domain::book::apply_patch(&book, patch, rental_open, updated_at)
        .map_err(from_status_error)?;
    persist(deps, &book, &updated).await?;

    tracing::info!(book_id = %book_id, status = %updated.status, "book patched");
    Ok(updated)
}

/// 書籍を削除する
///
/// 未返却の貸出が残っている書籍は削除できない。
pub async fn delete_book(deps: &ServiceDependencies, book_id: BookId) -> Result<()> {
    let book = load_book(deps, book_id).await?;
    if has_open_rental(deps, &book).await? {
        return Err(ApplicationError::BookStatusManagedByRental(book.status));
    }

    let deleted = deps
        .books
        .delete_by_id(book_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !deleted {
        return Err(ApplicationError::BookNotFound(book_id));
    }

    tracing::info!(book_id = %book_id, "book deleted");
    Ok(())
}

async fn load_book(deps: &ServiceDependencies, book_id: BookId) -> Result<Book> {
    deps.books
        .get_by_id(book_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::BookNotFound(book_id))
}

/// RENTEDの書籍に未返却の貸出が残っているか
///
/// RENTED以外の書籍では問い合わせない。
async fn has_open_rental(deps: &ServiceDependencies, book: &Book) -> Result<bool> {
    if book.status != BookStatus::Rented {
        return Ok(false);
    }
    deps.rentals
        .exists_open_by_book_id(book.book_id)
        .await
        .map_err(ApplicationError::RepositoryError)
}

/// RENTEDからの解放は条件付き更新、それ以外はupsert
async fn persist(deps: &ServiceDependencies, current: &Book, updated: &Book) -> Result<()> {
    if !domain::book::releases_rented(current, updated) {
        return deps
            .books
            .save(updated)
            .await
            .map_err(ApplicationError::RepositoryError);
    }

    let outcome = deps
        .books
        .release_rented(updated)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if outcome == WriteOutcome::Conflict {
        tracing::warn!(book_id = %updated.book_id, "book changed before release");
        return Err(ApplicationError::Conflict(format!(
            "Book was changed by another request: {}",
            updated.title
        )));
    }

    tracing::warn!(
        book_id = %updated.book_id,
        status = %updated.status,
        "rented book without an open rental was released"
    );
    Ok(())
}

async fn ensure_code_unused(deps: &ServiceDependencies, code: &str) -> Result<()> {
    let exists = deps
        .books
        .exists_by_code(code)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if exists {
        return Err(ApplicationError::BookCodeAlreadyExists(code.to_string()));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> Result<()> {
    if price < Decimal::ZERO {
        return Err(ApplicationError::InvalidRequest(format!(
            "Rental price must not be negative: {}",
            price
        )));
    }
    if !discount::is_storable_amount(price) {
        return Err(ApplicationError::InvalidRequest(format!(
            "Rental price must be at most {}: {}",
            discount::max_amount(),
            price
        )));
    }
    Ok(())
}

fn validate_volume(volume: u32) -> Result<()> {
    if volume == 0 {
        return Err(ApplicationError::InvalidRequest(
            "Volume must be at least 1".to_string(),
        ));
    }
    if volume > MAX_VOLUME {
        return Err(ApplicationError::InvalidRequest(format!(
            "Volume must be at most {}: {}",
            MAX_VOLUME, volume
        )));
    }
    Ok(())
}

fn from_status_error(err: BookStatusError) -> ApplicationError {
    match err {
        BookStatusError::ManagedByRental(status)
        | BookStatusError::NotAvailable(status) => ApplicationError::BookStatusManagedByRental(status),
        BookStatusError::NotRented(status) => ApplicationError::BookNotRented(status),
    }
}
