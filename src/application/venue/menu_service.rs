use crate::domain::{self, MenuId, MenuItem, discount};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::super::{ApplicationError, Result, ServiceDependencies};

/// メニューを登録する。単価は0以上、保存できる金額以下。
pub async fn register_menu_item(
    deps: &ServiceDependencies,
    name: String,
    price: Decimal,
    registered_at: DateTime<Utc>,
) -> Result<MenuItem> {
    if price < Decimal::ZERO {
        return Err(ApplicationError::InvalidRequest(format!(
            "Menu price must not be negative: {}",
            price
        )));
    }
    if !discount::is_storable_amount(price) {
        return Err(ApplicationError::InvalidRequest(format!(
            "Menu price must be at most {}: {}",
            discount::max_amount(),
            price
        )));
    }

    let menu_item = domain::menu::register_menu_item(name, price, registered_at);
    deps.menus
        .save(&menu_item)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(menu_id = %menu_item.menu_id, name = %menu_item.name, "menu item registered");
    Ok(menu_item)
}

pub async fn get_menu_item(deps: &ServiceDependencies, menu_id: MenuId) -> Result<MenuItem> {
    deps.menus
        .get_by_id(menu_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::MenuNotFound(menu_id))
}

pub async fn list_menu_items(deps: &ServiceDependencies) -> Result<Vec<MenuItem>> {
    deps.menus
        .list()
        .await
        .map_err(ApplicationError::RepositoryError)
}
