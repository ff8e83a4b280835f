//! Settings module: lot capacity and hourly rate

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
