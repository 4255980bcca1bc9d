use crate::domain::{Seat, SeatId};
use crate::ports::{Result, SeatRepository};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

fn map_row_to_seat(row: &PgRow) -> Seat {
    Seat {
        seat_id: SeatId::from_uuid(row.get("seat_id")),
        seat_number: row.get("seat_number"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// SeatRepositoryのPostgreSQL実装
pub struct PostgresSeatRepository {
    pool: PgPool,
}

impl PostgresSeatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeatRepository for PostgresSeatRepository {
    async fn get_by_id(&self, seat_id: SeatId) -> Result<Option<Seat>> {
        let row = sqlx::query(
            "SELECT seat_id, seat_number, created_at, updated_at FROM seats WHERE seat_id = $1",
        )
        .bind(seat_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_seat))
    }

    async fn list(&self) -> Result<Vec<Seat>> {
        let rows = sqlx::query(
            "SELECT seat_id, seat_number, created_at, updated_at FROM seats ORDER BY seat_number ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_seat).collect())
    }

    async fn exists_by_number(&self, seat_number: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM seats WHERE seat_number = $1)")
                .bind(seat_number)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn save(&self, seat: &Seat) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO seats (seat_id, seat_number, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (seat_id)
            DO UPDATE SET
                seat_number = EXCLUDED.seat_number,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(seat.seat_id.value())
        .bind(&seat.seat_number)
        .bind(seat.created_at)
        .bind(seat.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
