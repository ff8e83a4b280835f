//! Database entities module

pub mod parking_entry;
pub mod reservation;
pub mod settings;

pub use parking_entry::Entity as ParkingEntry;
pub use reservation::Entity as Reservation;
pub use settings::Entity as Settings;
