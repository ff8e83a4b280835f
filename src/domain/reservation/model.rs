//! Reservation domain entity

use chrono::{DateTime, Duration, Utc};

use crate::domain::entry::VehicleType;
use crate::domain::{DomainError, DomainResult};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Holding its slot
    Reserved,
    /// Vehicle arrived; the reservation became a parking entry
    CheckedIn,
    /// Cancelled by staff
    Cancelled,
    /// Hold window passed without the vehicle arriving
    Expired,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserved => "Reserved",
            Self::CheckedIn => "CheckedIn",
            Self::Cancelled => "Cancelled",
            Self::Expired => "Expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Reserved" => Some(Self::Reserved),
            "CheckedIn" => Some(Self::CheckedIn),
            "Cancelled" => Some(Self::Cancelled),
            "Expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reservation fields known before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub slot_number: u32,
    pub reservation_datetime: DateTime<Utc>,
    pub customer_name: String,
    pub vehicle_number: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub created_at: DateTime<Utc>,
}

/// A slot held for a vehicle that has not arrived yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: i32,
    pub slot_number: u32,
    /// When the vehicle is expected
    pub reservation_datetime: DateTime<Utc>,
    pub customer_name: String,
    pub vehicle_number: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn from_new(id: i32, new: NewReservation) -> Self {
        Self {
            id,
            slot_number: new.slot_number,
            reservation_datetime: new.reservation_datetime,
            customer_name: new.customer_name,
            vehicle_number: new.vehicle_number,
            vehicle_type: new.vehicle_type,
            status: ReservationStatus::Reserved,
            created_at: new.created_at,
        }
    }

    /// Whether this reservation still claims its slot
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Reserved
    }

    /// Active and past `reservation_datetime + hold`
    pub fn is_overdue(&self, now: DateTime<Utc>, hold: Duration) -> bool {
        self.is_active() && now > self.reservation_datetime + hold
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        self.transition(ReservationStatus::Cancelled)
    }

    pub fn expire(&mut self) -> DomainResult<()> {
        self.transition(ReservationStatus::Expired)
    }

    pub fn check_in(&mut self) -> DomainResult<()> {
        self.transition(ReservationStatus::CheckedIn)
    }

    fn transition(&mut self, to: ReservationStatus) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Reserved => {
                self.status = to;
                Ok(())
            }
            ReservationStatus::CheckedIn
            | ReservationStatus::Cancelled
            | ReservationStatus::Expired => Err(DomainError::Validation(format!(
                "Reservation {} is not active (status: {})",
                self.id, self.status
            ))),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reservation() -> Reservation {
        let now = Utc::now();
        Reservation::from_new(
            1,
            NewReservation {
                slot_number: 4,
                reservation_datetime: now + Duration::hours(1),
                customer_name: "Sam Ortiz".into(),
                vehicle_number: Some("KA-01-7788".into()),
                vehicle_type: Some(VehicleType::Car),
                created_at: now,
            },
        )
    }

    #[test]
    fn new_reservation_is_active() {
        let r = sample_reservation();
        assert!(r.is_active());
        assert_eq!(r.status, ReservationStatus::Reserved);
        assert_eq!(r.slot_number, 4);
    }

    #[test]
    fn cancel_sets_cancelled() {
        let mut r = sample_reservation();
        r.cancel().unwrap();
        assert_eq!(r.status, ReservationStatus::Cancelled);
        assert!(!r.is_active());
    }

    #[test]
    fn check_in_sets_checked_in() {
        let mut r = sample_reservation();
        r.check_in().unwrap();
        assert_eq!(r.status, ReservationStatus::CheckedIn);
    }

    #[test]
    fn terminal_states_are_final() {
        let mut r = sample_reservation();
        r.expire().unwrap();
        assert!(r.cancel().is_err());
        assert!(r.check_in().is_err());
        assert_eq!(r.status, ReservationStatus::Expired);
    }

    #[test]
    fn overdue_only_after_hold_window() {
        let r = sample_reservation();
        let hold = Duration::minutes(30);
        assert!(!r.is_overdue(r.reservation_datetime, hold));
        assert!(!r.is_overdue(r.reservation_datetime + Duration::minutes(30), hold));
        assert!(r.is_overdue(r.reservation_datetime + Duration::minutes(31), hold));
    }

    #[test]
    fn status_roundtrip() {
        for status in [
            ReservationStatus::Reserved,
            ReservationStatus::CheckedIn,
            ReservationStatus::Cancelled,
            ReservationStatus::Expired,
        ] {
            assert_eq!(ReservationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReservationStatus::parse("Accepted"), None);
    }
}
