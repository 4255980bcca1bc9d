use crate::domain::{Book, BookId, BookStatus};
use crate::ports::{BookRepository, Result, WriteOutcome};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{invalid_data, parse_column, unsigned_column};

const BOOK_COLUMNS: &str = r#"
    book_id, code, title, author, publisher, volume, genre, rental_price,
    status, book_condition, location, note, created_at, updated_at
"#;

fn map_row_to_book(row: &PgRow) -> Result<Book> {
    Ok(Book {
        book_id: BookId::from_uuid(row.get("book_id")),
        code: row.get("code"),
        title: row.get("title"),
        author: row.get("author"),
        publisher: row.get("publisher"),
        volume: unsigned_column(row, "volume")?,
        genre: row.get("genre"),
        rental_price: row.get("rental_price"),
        status: parse_column(row, "status")?,
        condition: parse_column(row, "book_condition")?,
        location: row.get("location"),
        note: row.get("note"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// BookRepositoryのPostgreSQL実装
pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM books WHERE book_id = $1",
            BOOK_COLUMNS
        ))
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(&format!("SELECT {} FROM books ORDER BY code ASC", BOOK_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_row_to_book).collect()
    }

    async fn find_by_status(&self, status: BookStatus) -> Result<Vec<Book>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM books WHERE status = $1 ORDER BY code ASC",
            BOOK_COLUMNS
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_book).collect()
    }

    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Book>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM books WHERE genre = $1 ORDER BY code ASC",
            BOOK_COLUMNS
        ))
        .bind(genre)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_book).collect()
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM books WHERE code = $1)")
            .bind(code)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// 状態列はRENTEDが絡む場合のみ保存済みの値を残す
    async fn save(&self, book: &Book) -> Result<()> {
        let volume = i32::try_from(book.volume)
            .map_err(|_| invalid_data(format!("volume out of range: {}", book.volume)))?;

        sqlx::query(
            r#"
            INSERT INTO books (
                book_id, code, title, author, publisher, volume, genre, rental_price,
                status, book_condition, location, note, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (book_id)
            DO UPDATE SET
                code = EXCLUDED.code,
                title = EXCLUDED.title,
                author = EXCLUDED.author,
                publisher = EXCLUDED.publisher,
                volume = EXCLUDED.volume,
                genre = EXCLUDED.genre,
                rental_price = EXCLUDED.rental_price,
                status = CASE
                    WHEN books.status = 'RENTED' OR EXCLUDED.status = 'RENTED' THEN books.status
                    ELSE EXCLUDED.status
                END,
                book_condition = EXCLUDED.book_condition,
                location = EXCLUDED.location,
                note = EXCLUDED.note,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(book.book_id.value())
        .bind(&book.code)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(volume)
        .bind(&book.genre)
        .bind(book.rental_price)
        .bind(book.status.as_str())
        .bind(book.condition.as_str())
        .bind(&book.location)
        .bind(&book.note)
        .bind(book.created_at)
        .bind(book.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn release_rented(&self, book: &Book) -> Result<WriteOutcome> {
        let volume = i32::try_from(book.volume)
            .map_err(|_| invalid_data(format!("volume out of range: {}", book.volume)))?;

        let result = sqlx::query(
            r#"
            UPDATE books
            SET code = $2, title = $3, author = $4, publisher = $5, volume = $6,
                genre = $7, rental_price = $8, status = $9, book_condition = $10,
                location = $11, note = $12, updated_at = $13
            WHERE book_id = $1
              AND status = 'RENTED'
              AND NOT EXISTS (
                  SELECT 1 FROM rentals WHERE book_id = $1 AND status <> 'RETURNED'
              )
            "#,
        )
        .bind(book.book_id.value())
        .bind(&book.code)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(volume)
        .bind(&book.genre)
        .bind(book.rental_price)
        .bind(book.status.as_str())
        .bind(book.condition.as_str())
        .bind(&book.location)
        .bind(&book.note)
        .bind(book.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() != 1 {
            tracing::debug!(book_id = %book.book_id, "book still has an open rental at write time");
            return Ok(WriteOutcome::Conflict);
        }
        Ok(WriteOutcome::Applied)
    }

    async fn delete_by_id(&self, book_id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(book_id.value())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
