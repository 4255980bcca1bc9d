//! プロセス内メモリに保持するリポジトリ実装
//!
//! `STORAGE_BACKEND=memory`での起動とテストに使用される。
//! すべての集約を1つのMutexで保護するため、`open_rental`/`close_rental`の
//! 確認と書き込みは他の操作と交互に実行されない。
mod book_repository;
mod member_repository;
mod menu_repository;
mod order_repository;
mod rental_repository;
mod seat_repository;

use crate::application::ServiceDependencies;
use crate::domain::{
    Book, BookId, Member, MemberId, MenuId, MenuItem, Order, OrderId, Rental, RentalId, Seat,
    SeatId,
};
use crate::ports::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    members: HashMap<MemberId, Member>,
    books: HashMap<BookId, Book>,
    seats: HashMap<SeatId, Seat>,
    menus: HashMap<MenuId, MenuItem>,
    rentals: HashMap<RentalId, Rental>,
    orders: HashMap<OrderId, Order>,
}

/// 全リポジトリポートを実装するインメモリストア
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// このストアを全ポートに割り当てた依存関係を作る
    pub fn into_dependencies(self: Arc<Self>) -> ServiceDependencies {
        ServiceDependencies {
            members: self.clone(),
            books: self.clone(),
            seats: self.clone(),
            menus: self.clone(),
            rentals: self.clone(),
            orders: self,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".into())
    }
}

/// 並び替え済みのVecへ
fn sorted_by<T: Clone, K: Ord>(
    items: impl Iterator<Item = T>,
    key: impl FnMut(&T) -> K,
) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(key);
    items
}
