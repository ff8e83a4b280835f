//! Occupancy module: slot availability and front-desk dashboard

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
