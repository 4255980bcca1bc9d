use crate::domain::{MemberId, MenuId, Order, OrderId, OrderStatus, Quantity, SeatId};
use crate::ports::{OrderRepository, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{invalid_data, parse_column, unsigned_column};

const ORDER_COLUMNS: &str = r#"
    order_id, member_id, seat_id, menu_id, quantity, unit_price, discounted_price,
    ordered_at, status, note, created_at, updated_at
"#;

fn map_row_to_order(row: &PgRow) -> Result<Order> {
    let quantity = Quantity::try_from(unsigned_column(row, "quantity")?)
        .map_err(|e| invalid_data(e.to_string()))?;

    Ok(Order {
        order_id: OrderId::from_uuid(row.get("order_id")),
        member_id: MemberId::from_uuid(row.get("member_id")),
        seat_id: SeatId::from_uuid(row.get("seat_id")),
        menu_id: MenuId::from_uuid(row.get("menu_id")),
        quantity,
        unit_price: row.get("unit_price"),
        discounted_price: row.get("discounted_price"),
        ordered_at: row.get("ordered_at"),
        status: parse_column(row, "status")?,
        note: row.get("note"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// OrderRepositoryのPostgreSQL実装
///
/// 合計金額は単価と数量から導出されるため列として持たない。
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn get_by_id(&self, order_id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM orders WHERE order_id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_order).transpose()
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM orders ORDER BY ordered_at DESC",
            ORDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_order).collect()
    }

    async fn find_by_member_id(&self, member_id: MemberId) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM orders WHERE member_id = $1 ORDER BY ordered_at DESC",
            ORDER_COLUMNS
        ))
        .bind(member_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_order).collect()
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM orders WHERE status = $1 ORDER BY ordered_at DESC",
            ORDER_COLUMNS
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_order).collect()
    }

    async fn save(&self, order: &Order) -> Result<()> {
        let quantity = i32::try_from(order.quantity.value()).map_err(|_| {
            invalid_data(format!("quantity out of range: {}", order.quantity.value()))
        })?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                order_id, member_id, seat_id, menu_id, quantity, unit_price, discounted_price,
                ordered_at, status, note, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (order_id)
            DO UPDATE SET
                quantity = EXCLUDED.quantity,
                unit_price = EXCLUDED.unit_price,
                discounted_price = EXCLUDED.discounted_price,
                status = EXCLUDED.status,
                note = EXCLUDED.note,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(order.order_id.value())
        .bind(order.member_id.value())
        .bind(order.seat_id.value())
        .bind(order.menu_id.value())
        .bind(quantity)
        .bind(order.unit_price)
        .bind(order.discounted_price)
        .bind(order.ordered_at)
        .bind(order.status.as_str())
        .bind(&order.note)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_by_id(&self, order_id: OrderId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id.value())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
