mod book_repository;
mod member_repository;
mod menu_repository;
mod order_repository;
mod rental_repository;
mod seat_repository;

pub use book_repository::PostgresBookRepository;
pub use member_repository::PostgresMemberRepository;
pub use menu_repository::PostgresMenuRepository;
pub use order_repository::PostgresOrderRepository;
pub use rental_repository::PostgresRentalRepository;
pub use seat_repository::PostgresSeatRepository;

use crate::application::ServiceDependencies;
use crate::ports::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;
use std::sync::Arc;

/// 全ポートをPostgreSQL実装で構成した依存関係を作る
pub fn service_dependencies(pool: PgPool) -> ServiceDependencies {
    ServiceDependencies {
        members: Arc::new(PostgresMemberRepository::new(pool.clone())),
        books: Arc::new(PostgresBookRepository::new(pool.clone())),
        seats: Arc::new(PostgresSeatRepository::new(pool.clone())),
        menus: Arc::new(PostgresMenuRepository::new(pool.clone())),
        rentals: Arc::new(PostgresRentalRepository::new(pool.clone())),
        orders: Arc::new(PostgresOrderRepository::new(pool)),
    }
}

fn invalid_data(message: impl Into<String>) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message.into(),
    ))
}

/// 文字列で保存された列挙型の列を読み取る
fn parse_column<T>(row: &PgRow, column: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    let value: &str = row.get(column);
    T::from_str(value).map_err(invalid_data)
}

/// 0以上のINTEGER列をu32として読み取る
fn unsigned_column(row: &PgRow, column: &str) -> Result<u32> {
    let value: i32 = row.get(column);
    u32::try_from(value).map_err(|_| invalid_data(format!("{} out of range: {}", column, value)))
}
