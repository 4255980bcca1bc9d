use crate::domain::{Seat, SeatId};
use async_trait::async_trait;

use super::Result;

/// 座席リポジトリポート
#[async_trait]
pub trait SeatRepository: Send + Sync {
    async fn get_by_id(&self, seat_id: SeatId) -> Result<Option<Seat>>;

    async fn list(&self) -> Result<Vec<Seat>>;

    async fn exists_by_number(&self, seat_number: &str) -> Result<bool>;

    async fn save(&self, seat: &Seat) -> Result<()>;
}
