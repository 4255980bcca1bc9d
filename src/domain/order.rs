use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    Member, MemberId, MenuId, MenuItem, OrderId, PlaceOrderError, Quantity, Seat, SeatId,
    discount,
};

/// 注文状態
///
/// 遷移の制約はない。どの状態からどの状態へも変更できる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// 受付済み
    #[default]
    Pending,
    /// 準備中
    Preparing,
    /// 提供済み
    Completed,
    /// 取消
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PREPARING" => Ok(OrderStatus::Preparing),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Invalid order status: {}", s)),
        }
    }
}

/// 注文集約 - 座席からの1メニューの注文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,

    // 他の集約への参照（IDのみ）
    pub member_id: MemberId,
    pub seat_id: SeatId,
    pub menu_id: MenuId,

    pub quantity: Quantity,
    /// 注文時点のメニュー単価
    pub unit_price: Decimal,
    /// ランク割引後の金額
    pub discounted_price: Decimal,

    pub ordered_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// 割引前の合計金額（単価 × 数量）
    ///
    /// 単価と数量から常に導出され、個別に設定することはできない。
    /// `place_order`で範囲内であることを確認済み。
    pub fn total_price(&self) -> Decimal {
        self.unit_price
            .saturating_mul(Decimal::from(self.quantity.value()))
    }
}

/// 単価 × 数量。Decimalで表現できない場合はNone。
pub fn line_total(unit_price: Decimal, quantity: Quantity) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity.value()))
}

/// 純粋関数：注文する
///
/// ビジネスルール：
/// - 合計 = メニュー単価 × 数量
/// - 割引は貸出と同じ`discount::apply_discount`を使う
/// - 合計は保存できる金額以下であること
/// - 状態はPENDING
pub fn place_order(
    member: &Member,
    seat: &Seat,
    menu: &MenuItem,
    quantity: Quantity,
    note: Option<String>,
    ordered_at: DateTime<Utc>,
) -> Result<Order, PlaceOrderError> {
    let total = line_total(menu.price, quantity)
        .filter(|total| discount::is_storable_amount(*total))
        .ok_or(PlaceOrderError::AmountOutOfRange)?;

    Ok(Order {
        order_id: OrderId::new(),
        member_id: member.member_id,
        seat_id: seat.seat_id,
        menu_id: menu.menu_id,
        quantity,
        unit_price: menu.price,
        discounted_price: discount::apply_discount(member.tier, total),
        ordered_at,
        status: OrderStatus::Pending,
        note,
        created_at: ordered_at,
        updated_at: ordered_at,
    })
}

/// 純粋関数：注文状態を変更する
///
/// 承認フローは持たないため、任意の状態を受け付ける。
pub fn change_status(order: &Order, status: OrderStatus, changed_at: DateTime<Utc>) -> Order {
    Order {
        status,
        updated_at: changed_at,
        ..order.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::{MemberProfile, MemberTier, register_member};
    use crate::domain::menu::register_menu_item;
    use crate::domain::seat::register_seat;

    fn member(tier: MemberTier) -> Member {
        register_member(
            MemberProfile {
                name: "Choi".to_string(),
                email: "choi@example.com".to_string(),
                phone: None,
            },
            tier,
            Utc::now(),
        )
    }

    #[test]
    fn test_place_order_computes_total_and_discount() {
        let now = Utc::now();
        let seat = register_seat("A-01".to_string(), now);
        let menu = register_menu_item("Iced Americano".to_string(), Decimal::new(4500, 0), now);
        let quantity = Quantity::try_from(3).unwrap();

        let order =
            place_order(&member(MemberTier::Vip), &seat, &menu, quantity, None, now).unwrap();

        assert_eq!(order.total_price(), Decimal::new(13500, 0));
        assert_eq!(order.discounted_price, Decimal::new(11475, 0));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.seat_id, seat.seat_id);
        assert_eq!(order.menu_id, menu.menu_id);
        assert_eq!(order.ordered_at, now);
    }

    #[test]
    fn test_total_price_follows_unit_price_and_quantity() {
        let now = Utc::now();
        let seat = register_seat("B-02".to_string(), now);
        let menu = register_menu_item("Ramen".to_string(), Decimal::new(350050, 2), now);
        let quantity = Quantity::try_from(2).unwrap();

        let order =
            place_order(&member(MemberTier::Bronze), &seat, &menu, quantity, None, now).unwrap();
        assert_eq!(order.total_price(), Decimal::new(700100, 2));
        assert_eq!(order.discounted_price, order.total_price());

        let bigger = Order {
            quantity: Quantity::try_from(4).unwrap(),
            ..order
        };
        assert_eq!(bigger.total_price(), Decimal::new(1400200, 2));
    }

    #[test]
    fn test_change_status_accepts_any_transition() {
        let now = Utc::now();
        let seat = register_seat("C-03".to_string(), now);
        let menu = register_menu_item("Cola".to_string(), Decimal::new(2000, 0), now);
        let order = place_order(
            &member(MemberTier::Gold),
            &seat,
            &menu,
            Quantity::try_from(1).unwrap(),
            None,
            now,
        )
        .unwrap();

        let completed = change_status(&order, OrderStatus::Completed, now);
        assert_eq!(completed.status, OrderStatus::Completed);

        // 完了から受付済みへ戻すことも許可される
        let reopened = change_status(&completed, OrderStatus::Pending, now);
        assert_eq!(reopened.status, OrderStatus::Pending);
        assert_eq!(reopened.total_price(), order.total_price());
    }

    #[test]
    fn test_place_order_rejects_unstorable_total() {
        let now = Utc::now();
        let seat = register_seat("D-04".to_string(), now);
        let menu = register_menu_item("Gold leaf parfait".to_string(), Decimal::MAX, now);
        let quantity = Quantity::try_from(2).unwrap();

        let result = place_order(&member(MemberTier::Vip), &seat, &menu, quantity, None, now);
        assert_eq!(result.unwrap_err(), PlaceOrderError::AmountOutOfRange);

        let expensive = register_menu_item(
            "Private room".to_string(),
            discount::max_amount(),
            now,
        );
        let result = place_order(&member(MemberTier::Vip), &seat, &expensive, quantity, None, now);
        assert_eq!(result.unwrap_err(), PlaceOrderError::AmountOutOfRange);
    }
}
