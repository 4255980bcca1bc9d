use crate::domain::{self, MemberId, OrderId, OrderStatus, PlaceOrderError, commands::*};

use super::super::{ApplicationError, Result, ServiceDependencies};
use super::details::{OrderDetails, describe, describe_all};

/// 注文する
///
/// ビジネスルール：
/// 1. 会員・メニュー・座席が存在すること（この順で確認する）
/// 2. 合計 = メニュー単価 × 数量
/// 3. 会員ランクの割引を適用する
/// 4. 合計が保存できる金額を超える場合は不正な入力とする
/// 5. PENDINGで保存する
///
/// 数量が1以上であることは`Quantity`の生成時に保証されている。
pub async fn place_order(deps: &ServiceDependencies, cmd: PlaceOrder) -> Result<OrderDetails> {
    let member = deps
        .members
        .get_by_id(cmd.member_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::MemberNotFound(cmd.member_id))?;

    let menu = deps
        .menus
        .get_by_id(cmd.menu_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::MenuNotFound(cmd.menu_id))?;

    let seat = deps
        .seats
        .get_by_id(cmd.seat_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::SeatNotFound(cmd.seat_id))?;

    let order = domain::order::place_order(
        &member,
        &seat,
        &menu,
        cmd.quantity,
        cmd.note,
        cmd.ordered_at,
    )
    .map_err(|e| match e {
        PlaceOrderError::AmountOutOfRange => ApplicationError::InvalidRequest(format!(
            "Order total is out of range: {} x {}",
            menu.price,
            cmd.quantity.value()
        )),
    })?;

    deps.orders
        .save(&order)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(
        order_id = %order.order_id,
        member_id = %member.member_id,
        seat = %seat.seat_number,
        menu = %menu.name,
        quantity = order.quantity.value(),
        total = %order.total_price(),
        discounted = %order.discounted_price,
        "order placed"
    );

    Ok(describe(order, Some(&member), Some(&seat), Some(&menu)))
}

/// 注文状態を変更する
///
/// 遷移の制約はなく、指定された状態で上書きする。
pub async fn change_order_status(
    deps: &ServiceDependencies,
    cmd: ChangeOrderStatus,
) -> Result<OrderDetails> {
    let order = deps
        .orders
        .get_by_id(cmd.order_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::OrderNotFound(cmd.order_id))?;

    let previous = order.status;
    let updated = domain::order::change_status(&order, cmd.status, cmd.changed_at);

    deps.orders
        .save(&updated)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(
        order_id = %updated.order_id,
        from = previous.as_str(),
        to = updated.status.as_str(),
        "order status changed"
    );

    describe_all(deps, vec![updated])
        .await
        .map(|mut details| details.remove(0))
}

/// 注文を削除する
pub async fn delete_order(deps: &ServiceDependencies, order_id: OrderId) -> Result<()> {
    let deleted = deps
        .orders
        .delete_by_id(order_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !deleted {
        return Err(ApplicationError::OrderNotFound(order_id));
    }

    tracing::info!(order_id = %order_id, "order deleted");
    Ok(())
}

/// IDで注文を取得する
pub async fn get_order(deps: &ServiceDependencies, order_id: OrderId) -> Result<OrderDetails> {
    let order = deps
        .orders
        .get_by_id(order_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::OrderNotFound(order_id))?;

    describe_all(deps, vec![order])
        .await
        .map(|mut details| details.remove(0))
}

/// 注文一覧を取得する。状態を指定した場合はその状態のみ。
pub async fn list_orders(
    deps: &ServiceDependencies,
    status: Option<OrderStatus>,
) -> Result<Vec<OrderDetails>> {
    let orders = match status {
        Some(status) => deps.orders.find_by_status(status).await,
        None => deps.orders.list().await,
    }
    .map_err(ApplicationError::RepositoryError)?;

    describe_all(deps, orders).await
}

/// 会員の注文履歴を取得する
pub async fn list_member_orders(
    deps: &ServiceDependencies,
    member_id: MemberId,
) -> Result<Vec<OrderDetails>> {
    let orders = deps
        .orders
        .find_by_member_id(member_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    describe_all(deps, orders).await
}
