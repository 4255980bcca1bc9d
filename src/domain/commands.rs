use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, MemberId, MenuId, OrderId, OrderStatus, Quantity, RentalDays, RentalId, SeatId};

/// コマンド：書籍を貸し出す
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentBook {
    pub member_id: MemberId,
    pub book_id: BookId,
    /// 未指定の場合は`RentalDays::DEFAULT`
    pub rental_days: Option<RentalDays>,
    pub note: Option<String>,
    pub rented_at: DateTime<Utc>,
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRental {
    pub rental_id: RentalId,
    pub returned_at: DateTime<Utc>,
}

/// コマンド：注文する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub member_id: MemberId,
    pub seat_id: SeatId,
    pub menu_id: MenuId,
    pub quantity: Quantity,
    pub note: Option<String>,
    pub ordered_at: DateTime<Utc>,
}

/// コマンド：注文状態を変更する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeOrderStatus {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub changed_at: DateTime<Utc>,
}
