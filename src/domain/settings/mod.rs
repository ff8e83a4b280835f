//! Capacity configuration aggregate
//!
//! The singleton holding total slot count and hourly rate.

pub mod model;
pub mod repository;

pub use model::ParkingSettings;
pub use repository::SettingsRepository;
