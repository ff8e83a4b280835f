//! Parking entry repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{EntryFilter, NewEntry, ParkingEntry};
use crate::domain::DomainResult;

#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Insert a new Parked entry and return it with its assigned id
    async fn create(&self, entry: NewEntry) -> DomainResult<ParkingEntry>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingEntry>>;

    /// All entries currently Parked
    async fn find_parked(&self) -> DomainResult<Vec<ParkingEntry>>;

    /// Every entry for a registration number (any status), newest first.
    /// `vehicle_number` must already be normalized.
    async fn find_by_vehicle(&self, vehicle_number: &str) -> DomainResult<Vec<ParkingEntry>>;

    /// Persist a checkout. The write applies only while the stored entry is
    /// still Parked; returns `false` when it had already exited.
    async fn complete_checkout(&self, entry: &ParkingEntry) -> DomainResult<bool>;

    /// Entries matching `filter`, newest first
    async fn search(&self, filter: &EntryFilter) -> DomainResult<Vec<ParkingEntry>>;

    /// Entries whose `entry_time` falls in `[from, to]`, newest first
    async fn find_entered_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<ParkingEntry>>;
}
