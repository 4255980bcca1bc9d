use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MenuId;

/// メニュー（飲み物・軽食）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub menu_id: MenuId,
    pub name: String,
    /// 単価
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 純粋関数：メニューを登録する
pub fn register_menu_item(name: String, price: Decimal, registered_at: DateTime<Utc>) -> MenuItem {
    MenuItem {
        menu_id: MenuId::new(),
        name,
        price,
        created_at: registered_at,
        updated_at: registered_at,
    }
}
