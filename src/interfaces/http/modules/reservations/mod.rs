//! Reservations module: create, list, cancel, check in

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
