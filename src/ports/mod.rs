pub mod book_repository;
pub mod member_repository;
pub mod menu_repository;
pub mod order_repository;
pub mod rental_repository;
pub mod seat_repository;

pub use book_repository::BookRepository;
pub use member_repository::MemberRepository;
pub use menu_repository::MenuRepository;
pub use order_repository::OrderRepository;
pub use rental_repository::{RentalRepository, WriteOutcome};
pub use seat_repository::SeatRepository;

/// ポート共通のResult型
///
/// 永続化の失敗はアダプターごとに異なるため、型消去したエラーで返す。
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
