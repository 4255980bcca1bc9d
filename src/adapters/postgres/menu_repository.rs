use crate::domain::{MenuId, MenuItem};
use crate::ports::{MenuRepository, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

fn map_row_to_menu_item(row: &PgRow) -> MenuItem {
    MenuItem {
        menu_id: MenuId::from_uuid(row.get("menu_id")),
        name: row.get("name"),
        price: row.get("price"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// MenuRepositoryのPostgreSQL実装
pub struct PostgresMenuRepository {
    pool: PgPool,
}

impl PostgresMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuRepository for PostgresMenuRepository {
    async fn get_by_id(&self, menu_id: MenuId) -> Result<Option<MenuItem>> {
        let row = sqlx::query(
            "SELECT menu_id, name, price, created_at, updated_at FROM menu_items WHERE menu_id = $1",
        )
        .bind(menu_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_menu_item))
    }

    async fn list(&self) -> Result<Vec<MenuItem>> {
        let rows = sqlx::query(
            "SELECT menu_id, name, price, created_at, updated_at FROM menu_items ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_menu_item).collect())
    }

    async fn save(&self, menu_item: &MenuItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO menu_items (menu_id, name, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (menu_id)
            DO UPDATE SET
                name = EXCLUDED.name,
                price = EXCLUDED.price,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(menu_item.menu_id.value())
        .bind(&menu_item.name)
        .bind(menu_item.price)
        .bind(menu_item.created_at)
        .bind(menu_item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
