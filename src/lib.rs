//! # Parking lot service
//!
//! Slot allocation, checkout billing, reservations and occupancy reports
//! for a single parking lot, exposed as a REST API.
//!
//! ## Architecture
//!
//! - **domain**: entries, reservations, settings, the occupancy ledger and
//!   the billing rule; repository traits
//! - **application**: services that serialize slot allocation and drive
//!   state transitions
//! - **infrastructure**: SeaORM store with migrations, in-memory store
//! - **interfaces**: axum REST API with Swagger documentation
//! - **server**: process lifecycle shared by the binary and tests

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::create_api_router;
