use crate::domain::{MemberId, Order, OrderId, OrderStatus};
use crate::ports::{OrderRepository, Result};
use async_trait::async_trait;
use std::cmp::Reverse;

use super::{InMemoryStore, sorted_by};

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn get_by_id(&self, order_id: OrderId) -> Result<Option<Order>> {
        Ok(self.lock()?.orders.get(&order_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let state = self.lock()?;
        Ok(sorted_by(state.orders.values().cloned(), |o| Reverse(o.ordered_at)))
    }

    async fn find_by_member_id(&self, member_id: MemberId) -> Result<Vec<Order>> {
        let state = self.lock()?;
        Ok(sorted_by(
            state.orders.values().filter(|o| o.member_id == member_id).cloned(),
            |o| Reverse(o.ordered_at),
        ))
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let state = self.lock()?;
        Ok(sorted_by(
            state.orders.values().filter(|o| o.status == status).cloned(),
            |o| Reverse(o.ordered_at),
        ))
    }

    async fn save(&self, order: &Order) -> Result<()> {
        self.lock()?.orders.insert(order.order_id, order.clone());
        Ok(())
    }

    async fn delete_by_id(&self, order_id: OrderId) -> Result<bool> {
        Ok(self.lock()?.orders.remove(&order_id).is_some())
    }
}
