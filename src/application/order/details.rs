use crate::domain::{Member, MemberId, MemberTier, MenuId, MenuItem, Order, Seat, SeatId};
use std::collections::HashMap;

use super::super::{ApplicationError, Result, ServiceDependencies};

/// 注文の表示用ビュー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub order: Order,
    pub member_name: Option<String>,
    pub member_tier: Option<MemberTier>,
    pub seat_number: Option<String>,
    pub menu_name: Option<String>,
}

pub(super) fn describe(
    order: Order,
    member: Option<&Member>,
    seat: Option<&Seat>,
    menu: Option<&MenuItem>,
) -> OrderDetails {
    OrderDetails {
        member_name: member.map(|m| m.name.clone()),
        member_tier: member.map(|m| m.tier),
        seat_number: seat.map(|s| s.seat_number.clone()),
        menu_name: menu.map(|m| m.name.clone()),
        order,
    }
}

pub(super) async fn describe_all(
    deps: &ServiceDependencies,
    orders: Vec<Order>,
) -> Result<Vec<OrderDetails>> {
    let mut members: HashMap<MemberId, Option<Member>> = HashMap::new();
    let mut seats: HashMap<SeatId, Option<Seat>> = HashMap::new();
    let mut menus: HashMap<MenuId, Option<MenuItem>> = HashMap::new();
    let mut details = Vec::with_capacity(orders.len());

    for order in orders {
        if !members.contains_key(&order.member_id) {
            let member = deps
                .members
                .get_by_id(order.member_id)
                .await
                .map_err(ApplicationError::RepositoryError)?;
            members.insert(order.member_id, member);
        }
        if !seats.contains_key(&order.seat_id) {
            let seat = deps
                .seats
                .get_by_id(order.seat_id)
                .await
                .map_err(ApplicationError::RepositoryError)?;
            seats.insert(order.seat_id, seat);
        }
        if !menus.contains_key(&order.menu_id) {
            let menu = deps
                .menus
                .get_by_id(order.menu_id)
                .await
                .map_err(ApplicationError::RepositoryError)?;
            menus.insert(order.menu_id, menu);
        }

        let member = members.get(&order.member_id).and_then(Option::as_ref);
        let seat = seats.get(&order.seat_id).and_then(Option::as_ref);
        let menu = menus.get(&order.menu_id).and_then(Option::as_ref);
        details.push(describe(order, member, seat, menu));
    }

    Ok(details)
}
