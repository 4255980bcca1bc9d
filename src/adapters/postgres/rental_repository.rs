use crate::domain::{Book, BookId, MemberId, Rental, RentalId, RentalStatus};
use crate::ports::{RentalRepository, Result, WriteOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use sqlx::{PgPool, Row, postgres::PgRow};

use super::parse_column;

const RENTAL_COLUMNS: &str = r#"
    rental_id, member_id, book_id, rented_at, due_at, returned_at, status,
    base_fee, discounted_fee, note, created_at, updated_at
"#;

fn map_row_to_rental(row: &PgRow) -> Result<Rental> {
    Ok(Rental {
        rental_id: RentalId::from_uuid(row.get("rental_id")),
        member_id: MemberId::from_uuid(row.get("member_id")),
        book_id: BookId::from_uuid(row.get("book_id")),
        rented_at: row.get("rented_at"),
        due_at: row.get("due_at"),
        returned_at: row.get("returned_at"),
        status: parse_column(row, "status")?,
        base_fee: row.get("base_fee"),
        discounted_fee: row.get("discounted_fee"),
        note: row.get("note"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// RentalRepositoryのPostgreSQL実装
///
/// `open_rental`/`close_rental`は書籍行の条件付き更新と貸出行の書き込みを
/// 1トランザクションで行う。途中で戻った場合、`sqlx::Transaction`の
/// ドロップでロールバックされる。
pub struct PostgresRentalRepository {
    pool: PgPool,
}

impl PostgresRentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RentalRepository for PostgresRentalRepository {
    async fn get_by_id(&self, rental_id: RentalId) -> Result<Option<Rental>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM rentals WHERE rental_id = $1",
            RENTAL_COLUMNS
        ))
        .bind(rental_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_rental).transpose()
    }

    async fn list(&self) -> Result<Vec<Rental>> {
        let sql = format!("SELECT {} FROM rentals ORDER BY rented_at DESC", RENTAL_COLUMNS);
        sqlx::query(&sql)
            .fetch(&self.pool)
            .map(|row| map_row_to_rental(&row?))
            .try_collect()
            .await
    }

    async fn find_by_member_id(&self, member_id: MemberId) -> Result<Vec<Rental>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM rentals WHERE member_id = $1 ORDER BY rented_at DESC",
            RENTAL_COLUMNS
        ))
        .bind(member_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_rental).collect()
    }

    /// (member_id, status)のインデックスを使用する
    async fn find_by_member_and_status(
        &self,
        member_id: MemberId,
        status: RentalStatus,
    ) -> Result<Vec<Rental>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM rentals WHERE member_id = $1 AND status = $2 ORDER BY rented_at DESC",
            RENTAL_COLUMNS
        ))
        .bind(member_id.value())
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_rental).collect()
    }

    async fn count_by_member_and_status(
        &self,
        member_id: MemberId,
        status: RentalStatus,
    ) -> Result<usize> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM rentals WHERE member_id = $1 AND status = $2")
                .bind(member_id.value())
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(usize::try_from(count)?)
    }

    /// (status, due_at)のインデックスを使用する
    async fn find_overdue_candidates(&self, cutoff: DateTime<Utc>) -> Result<Vec<Rental>> {
        let sql = format!(
            "SELECT {} FROM rentals WHERE status = 'ACTIVE' AND due_at < $1 ORDER BY due_at ASC",
            RENTAL_COLUMNS
        );
        sqlx::query(&sql)
            .bind(cutoff)
            .fetch(&self.pool)
            .map(|row| map_row_to_rental(&row?))
            .try_collect()
            .await
    }

    async fn save(&self, rental: &Rental) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rentals (
                rental_id, member_id, book_id, rented_at, due_at, returned_at, status,
                base_fee, discounted_fee, note, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (rental_id)
            DO UPDATE SET
                due_at = EXCLUDED.due_at,
                returned_at = EXCLUDED.returned_at,
                status = EXCLUDED.status,
                note = EXCLUDED.note,
                updated_at = EXCLUDED.updated_at
            WHERE rentals.status <> 'RETURNED'
            "#,
        )
        .bind(rental.rental_id.value())
        .bind(rental.member_id.value())
        .bind(rental.book_id.value())
        .bind(rental.rented_at)
        .bind(rental.due_at)
        .bind(rental.returned_at)
        .bind(rental.status.as_str())
        .bind(rental.base_fee)
        .bind(rental.discounted_fee)
        .bind(&rental.note)
        .bind(rental.created_at)
        .bind(rental.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn exists_open_by_book_id(&self, book_id: BookId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM rentals WHERE book_id = $1 AND status <> 'RETURNED')",
        )
        .bind(book_id.value())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn delete_by_id(&self, rental_id: RentalId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM rentals WHERE rental_id = $1")
            .bind(rental_id.value())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn open_rental(&self, rental: &Rental, rented_book: &Book) -> Result<WriteOutcome> {
        let mut tx = self.pool.begin().await?;

        // 1. AVAILABLEの場合のみRENTEDへ
        let claimed = sqlx::query(
            r#"
            UPDATE books
            SET status = $2, updated_at = $3
            WHERE book_id = $1 AND status = 'AVAILABLE'
            "#,
        )
        .bind(rented_book.book_id.value())
        .bind(rented_book.status.as_str())
        .bind(rented_book.updated_at)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() != 1 {
            tx.rollback().await?;
            tracing::debug!(book_id = %rented_book.book_id, "book was not AVAILABLE at write time");
            return Ok(WriteOutcome::Conflict);
        }

        // 2. 貸出記録の挿入
        sqlx::query(
            r#"
            INSERT INTO rentals (
                rental_id, member_id, book_id, rented_at, due_at, returned_at, status,
                base_fee, discounted_fee, note, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(rental.rental_id.value())
        .bind(rental.member_id.value())
        .bind(rental.book_id.value())
        .bind(rental.rented_at)
        .bind(rental.due_at)
        .bind(rental.returned_at)
        .bind(rental.status.as_str())
        .bind(rental.base_fee)
        .bind(rental.discounted_fee)
        .bind(&rental.note)
        .bind(rental.created_at)
        .bind(rental.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(WriteOutcome::Applied)
    }

    async fn close_rental(&self, returned: &Rental, released_book: &Book) -> Result<WriteOutcome> {
        let mut tx = self.pool.begin().await?;

        // 1. 貸出記録をRETURNEDへ
        let closed = sqlx::query(
            r#"
            UPDATE rentals
            SET returned_at = $2, status = $3, updated_at = $4
            WHERE rental_id = $1 AND status <> 'RETURNED'
            "#,
        )
        .bind(returned.rental_id.value())
        .bind(returned.returned_at)
        .bind(returned.status.as_str())
        .bind(returned.updated_at)
        .execute(&mut *tx)
        .await?;

        if closed.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(WriteOutcome::Conflict);
        }

        // 2. 書籍をAVAILABLEへ
        let released = sqlx::query(
            r#"
            UPDATE books
            SET status = $2, updated_at = $3
            WHERE book_id = $1 AND status = 'RENTED'
            "#,
        )
        .bind(released_book.book_id.value())
        .bind(released_book.status.as_str())
        .bind(released_book.updated_at)
        .execute(&mut *tx)
        .await?;

        if released.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(WriteOutcome::Conflict);
        }

        tx.commit().await?;
        Ok(WriteOutcome::Applied)
    }
}
