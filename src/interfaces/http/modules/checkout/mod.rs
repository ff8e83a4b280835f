//! Checkout module: bill quote and stay completion

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
