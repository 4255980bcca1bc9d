pub mod book;
pub mod commands;
pub mod discount;
pub mod errors;
pub mod member;
pub mod menu;
pub mod order;
pub mod rental;
pub mod seat;
pub mod value_objects;

pub use book::{Book, BookCondition, BookStatus};
pub use errors::*;
pub use member::{Member, MemberTier};
pub use menu::MenuItem;
pub use order::{Order, OrderStatus};
pub use rental::{Rental, RentalStatus};
pub use seat::Seat;
pub use value_objects::*;
