//! Application layer: parking use cases and background tasks

pub mod services;

pub use services::{
    start_reservation_expiry_task, CheckInCommand, CheckoutOutcome, CreateEntryCommand,
    CreateReservationCommand, ParkingService, ReportPeriod, ReportService, ReservationPolicy,
    SettingsService,
};
