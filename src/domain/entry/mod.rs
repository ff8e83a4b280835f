//! Parking entry aggregate
//!
//! Contains the ParkingEntry entity, its lifecycle, search filter and
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{
    normalize_vehicle_number, EntryFilter, EntryStatus, ExitRecord, NewEntry, ParkingEntry,
    ReservationFlag, VehicleType,
};
pub use repository::EntryRepository;
