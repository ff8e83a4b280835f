//! Application services
//!
//! Use cases over the domain layer. Services take a `RepositoryProvider`
//! and a `Clock` so the same code runs against SQLite or the in-memory store.

mod lot;
pub mod parking;
pub mod report;
pub mod reservation_expiry;
pub mod settings;

pub use parking::{
    CheckInCommand, CheckoutOutcome, CreateEntryCommand, CreateReservationCommand,
    ParkingService, ReservationPolicy,
};
pub use report::{Dashboard, HourlyCount, PeriodSummary, ReportPeriod, ReportService};
pub use reservation_expiry::start_reservation_expiry_task;
pub use settings::SettingsService;
