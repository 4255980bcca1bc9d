mod details;
mod overdue_detection;
mod rental_service;

pub use details::RentalDetails;
pub use overdue_detection::detect_overdue_rentals;
pub use rental_service::{
    delete_rental, get_rental, list_member_rentals, list_rentals, rent_book, return_rental,
};
