pub mod checkout;
pub mod entries;
pub mod health;
pub mod metrics;
pub mod occupancy;
pub mod reports;
pub mod request_id;
pub mod reservations;
pub mod settings;
