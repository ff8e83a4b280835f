//! Reports module: daily, weekly and monthly summaries

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
