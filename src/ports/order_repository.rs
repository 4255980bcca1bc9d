use crate::domain::{MemberId, Order, OrderId, OrderStatus};
use async_trait::async_trait;

use super::Result;

/// 注文リポジトリポート
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get_by_id(&self, order_id: OrderId) -> Result<Option<Order>>;

    /// 注文日時の新しい順
    async fn list(&self) -> Result<Vec<Order>>;

    /// 会員の注文履歴（注文日時の新しい順）
    async fn find_by_member_id(&self, member_id: MemberId) -> Result<Vec<Order>>;

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>>;

    /// 注文の作成と状態変更に使用される（upsert）。
    async fn save(&self, order: &Order) -> Result<()>;

    async fn delete_by_id(&self, order_id: OrderId) -> Result<bool>;
}
