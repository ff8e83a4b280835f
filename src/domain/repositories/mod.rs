//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to the per-aggregate
//! repositories. Consumers request only the repository they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let settings = repos.settings().get().await?;
//!     let parked = repos.entries().find_parked().await?;
//! }
//! ```

use async_trait::async_trait;

use super::entry::{EntryRepository, NewEntry, ParkingEntry};
use super::reservation::{Reservation, ReservationRepository};
use super::settings::SettingsRepository;
use super::DomainResult;

#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn settings(&self) -> &dyn SettingsRepository;
    fn entries(&self) -> &dyn EntryRepository;
    fn reservations(&self) -> &dyn ReservationRepository;

    /// Store the reservation's CheckedIn status and insert `entry` as one
    /// atomic write. Either both land or neither does. Returns `None`, with
    /// nothing written, when the stored reservation is no longer Reserved.
    async fn check_in_reservation(
        &self,
        reservation: &Reservation,
        entry: NewEntry,
    ) -> DomainResult<Option<ParkingEntry>>;
}
