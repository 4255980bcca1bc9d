mod catalog_service;

pub use catalog_service::{
    BookFilter, delete_book, get_book, list_books, patch_book, register_book, update_book,
};
