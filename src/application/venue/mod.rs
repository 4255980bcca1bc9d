//! 店舗設備（座席・メニュー）の登録と参照
mod menu_service;
mod seat_service;

pub use menu_service::{get_menu_item, list_menu_items, register_menu_item};
pub use seat_service::{get_seat, list_seats, register_seat};
