//! Entries module: walk-in registration, search, lookup

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
