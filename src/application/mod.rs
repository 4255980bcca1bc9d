pub mod book;
mod dependencies;
mod errors;
pub mod member;
pub mod order;
pub mod rental;
pub mod venue;

pub use dependencies::ServiceDependencies;
pub use errors::{ApplicationError, ErrorKind, Result};
