//! Domain layer: parking records, occupancy rules and billing.
//!
//! Everything here is storage-agnostic. Repository traits describe what the
//! record store must offer; `infrastructure` supplies the implementations.

pub mod billing;
pub mod entry;
pub mod occupancy;
pub mod repositories;
pub mod reservation;
pub mod settings;

pub use billing::{compute_bill, Bill, BillingPolicy};
pub use entry::{
    normalize_vehicle_number, EntryFilter, EntryRepository, EntryStatus, ExitRecord, NewEntry,
    ParkingEntry, ReservationFlag, VehicleType,
};
pub use occupancy::{allocate, claim_specific, AllocationError, Availability, OccupancyLedger, SlotConflict};
pub use repositories::RepositoryProvider;
pub use reservation::{NewReservation, Reservation, ReservationRepository, ReservationStatus};
pub use settings::{ParkingSettings, SettingsRepository};

pub use crate::shared::errors::{DomainError, DomainResult};
