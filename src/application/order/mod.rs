mod details;
mod order_service;

pub use details::OrderDetails;
pub use order_service::{
    change_order_status, delete_order, get_order, list_member_orders, list_orders, place_order,
};
