//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewReservation, Reservation};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a new Reserved reservation and return it with its assigned id
    async fn create(&self, reservation: NewReservation) -> DomainResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// All reservations currently holding a slot (status = Reserved)
    async fn find_active(&self) -> DomainResult<Vec<Reservation>>;

    /// Find all reservations (any status), latest reservation time first
    async fn find_all(&self) -> DomainResult<Vec<Reservation>>;

    /// Reservations whose `reservation_datetime` falls in `[from, to]`
    async fn find_scheduled_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>>;

    /// Active reservations scheduled before `cutoff`
    async fn find_overdue(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Reservation>>;

    /// Persist a status transition. The write applies only while the stored
    /// reservation is still Reserved; returns `false` otherwise.
    async fn update_status(&self, reservation: &Reservation) -> DomainResult<bool>;
}
