//! Parking service: slot claims, checkout and the reservation lifecycle
//!
//! Every operation that creates a slot claim (walk-in entry, reservation,
//! reservation check-in) runs under one allocation lock, so reading the
//! current claims, picking a slot and persisting the record happen as a
//! single step for this process. The store's unique indexes back this up
//! across processes.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::lot::{current_ledger, require_settings};
use crate::domain::{
    allocate, claim_specific, compute_bill, normalize_vehicle_number, AllocationError,
    Availability, Bill, BillingPolicy, DomainError, DomainResult, NewEntry, NewReservation,
    ParkingEntry, RepositoryProvider, Reservation, ReservationFlag, VehicleType,
};
use crate::shared::SharedClock;

/// How long a reservation keeps its slot after the expected arrival time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationPolicy {
    /// Zero disables automatic expiry
    pub hold_minutes: u32,
}

impl ReservationPolicy {
    pub fn hold(&self) -> Duration {
        Duration::minutes(i64::from(self.hold_minutes))
    }

    pub fn expires(&self) -> bool {
        self.hold_minutes > 0
    }
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self { hold_minutes: 30 }
    }
}

/// Walk-in vehicle registration
#[derive(Debug, Clone)]
pub struct CreateEntryCommand {
    pub vehicle_number: String,
    pub owner_name: String,
    pub vehicle_type: VehicleType,
}

#[derive(Debug, Clone)]
pub struct CreateReservationCommand {
    /// Specific slot, or `None` for the lowest free one
    pub slot_number: Option<u32>,
    pub reservation_datetime: DateTime<Utc>,
    pub customer_name: String,
    pub vehicle_number: Option<String>,
    pub vehicle_type: Option<VehicleType>,
}

/// Arrival details supplied at check-in. Missing fields fall back to what
/// the reservation recorded.
#[derive(Debug, Clone, Default)]
pub struct CheckInCommand {
    pub vehicle_number: Option<String>,
    pub owner_name: Option<String>,
    pub vehicle_type: Option<VehicleType>,
}

/// An entry together with its bill. For a quote the entry is still Parked.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub entry: ParkingEntry,
    pub bill: Bill,
}

pub struct ParkingService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
    billing: BillingPolicy,
    reservations: ReservationPolicy,
    allocation_lock: Mutex<()>,
}

impl ParkingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        clock: SharedClock,
        billing: BillingPolicy,
        reservations: ReservationPolicy,
    ) -> Self {
        Self {
            repos,
            clock,
            billing,
            reservations,
            allocation_lock: Mutex::new(()),
        }
    }

    pub fn reservation_policy(&self) -> ReservationPolicy {
        self.reservations
    }

    // ── Occupancy ──────────────────────────────────────────────

    pub async fn get_availability(&self) -> DomainResult<Availability> {
        let settings = require_settings(self.repos.as_ref()).await?;
        let ledger = current_ledger(self.repos.as_ref()).await?;
        Ok(ledger.availability(settings.total_slots))
    }

    // ── Entries ────────────────────────────────────────────────

    /// Register a walk-in vehicle on the lowest free slot.
    pub async fn create_entry(&self, cmd: CreateEntryCommand) -> DomainResult<ParkingEntry> {
        let vehicle_number = required(&cmd.vehicle_number, "Vehicle number")?;
        let owner_name = required(&cmd.owner_name, "Owner name")?.to_string();
        let vehicle_number = normalize_vehicle_number(vehicle_number);

        let _guard = self.allocation_lock.lock().await;

        let settings = require_settings(self.repos.as_ref()).await?;
        self.ensure_not_parked(&vehicle_number).await?;

        let ledger = current_ledger(self.repos.as_ref()).await?;
        let slot = allocate(&ledger.active_claims(), settings.total_slots)
            .map_err(|e| self.rejection(e, settings.total_slots, "entry"))?;

        let entry = self
            .repos
            .entries()
            .create(NewEntry {
                vehicle_number,
                owner_name,
                vehicle_type: cmd.vehicle_type,
                entry_time: self.clock.now(),
                slot_number: slot,
                reservation_flag: ReservationFlag::No,
            })
            .await?;

        metrics::counter!("parking_entries_total", "source" => "walk_in").increment(1);
        info!(
            entry_id = entry.id,
            vehicle = %entry.vehicle_number,
            slot = entry.slot_number,
            "Vehicle parked"
        );

        Ok(entry)
    }

    pub async fn get_entry(&self, id: i32) -> DomainResult<ParkingEntry> {
        self.repos
            .entries()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingEntry", "id", id))
    }

    /// Bill a parked vehicle as of now without ending its stay.
    pub async fn quote_checkout(&self, vehicle_number: &str) -> DomainResult<CheckoutOutcome> {
        let settings = require_settings(self.repos.as_ref()).await?;
        let entry = self.find_parked_vehicle(vehicle_number).await?;
        let bill = compute_bill(
            entry.entry_time,
            self.clock.now(),
            settings.rate_per_hour,
            &self.billing,
        )?;
        Ok(CheckoutOutcome { entry, bill })
    }

    /// End a parked vehicle's stay and bill it.
    pub async fn checkout(&self, vehicle_number: &str) -> DomainResult<CheckoutOutcome> {
        let settings = require_settings(self.repos.as_ref()).await?;
        let mut entry = self.find_parked_vehicle(vehicle_number).await?;

        let bill = compute_bill(
            entry.entry_time,
            self.clock.now(),
            settings.rate_per_hour,
            &self.billing,
        )?;
        entry.checkout(&bill)?;

        // Conditional on the stored entry still being Parked
        if !self.repos.entries().complete_checkout(&entry).await? {
            warn!(entry_id = entry.id, "Concurrent checkout lost the race");
            return Err(DomainError::AlreadyExited(entry.vehicle_number));
        }

        metrics::counter!("parking_checkouts_total").increment(1);
        metrics::histogram!("parking_billed_hours").record(f64::from(bill.duration_hours));
        info!(
            entry_id = entry.id,
            vehicle = %entry.vehicle_number,
            slot = entry.slot_number,
            hours = bill.duration_hours,
            amount = %bill.total_amount,
            "Vehicle checked out"
        );

        Ok(CheckoutOutcome { entry, bill })
    }

    // ── Reservations ───────────────────────────────────────────

    /// Hold a slot for a vehicle that has not arrived yet.
    pub async fn create_reservation(
        &self,
        cmd: CreateReservationCommand,
    ) -> DomainResult<Reservation> {
        let customer_name = required(&cmd.customer_name, "Customer name")?.to_string();
        let vehicle_number = optional(cmd.vehicle_number.as_deref()).map(normalize_vehicle_number);

        let now = self.clock.now();
        if self.reservations.expires()
            && cmd.reservation_datetime + self.reservations.hold() < now
        {
            return Err(DomainError::Validation(format!(
                "Reservation time {} is already past its hold window",
                cmd.reservation_datetime
            )));
        }

        let _guard = self.allocation_lock.lock().await;

        let settings = require_settings(self.repos.as_ref()).await?;
        let ledger = current_ledger(self.repos.as_ref()).await?;
        let claims = ledger.active_claims();
        let slot = match cmd.slot_number {
            Some(requested) => claim_specific(&claims, settings.total_slots, requested),
            None => allocate(&claims, settings.total_slots),
        }
        .map_err(|e| self.rejection(e, settings.total_slots, "reservation"))?;

        let reservation = self
            .repos
            .reservations()
            .create(NewReservation {
                slot_number: slot,
                reservation_datetime: cmd.reservation_datetime,
                customer_name,
                vehicle_number,
                vehicle_type: cmd.vehicle_type,
                created_at: now,
            })
            .await?;

        info!(
            reservation_id = reservation.id,
            slot = reservation.slot_number,
            at = %reservation.reservation_datetime,
            "Slot reserved"
        );

        Ok(reservation)
    }

    pub async fn get_reservation(&self, id: i32) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id))
    }

    /// All reservations, latest scheduled first
    pub async fn list_reservations(&self) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().find_all().await
    }

    pub async fn cancel_reservation(&self, id: i32) -> DomainResult<Reservation> {
        let _guard = self.allocation_lock.lock().await;

        let mut reservation = self.get_reservation(id).await?;
        reservation.cancel()?;
        self.persist_transition(&reservation).await?;

        info!(reservation_id = id, slot = reservation.slot_number, "Reservation cancelled");
        Ok(reservation)
    }

    /// Turn a reservation into a Parked entry on the reserved slot.
    pub async fn check_in_reservation(
        &self,
        id: i32,
        cmd: CheckInCommand,
    ) -> DomainResult<ParkingEntry> {
        let _guard = self.allocation_lock.lock().await;

        let mut reservation = self.get_reservation(id).await?;

        let vehicle_number = optional(cmd.vehicle_number.as_deref())
            .or(optional(reservation.vehicle_number.as_deref()))
            .map(normalize_vehicle_number)
            .ok_or_else(|| DomainError::Validation("Vehicle number is required".to_string()))?;
        let vehicle_type = cmd
            .vehicle_type
            .or(reservation.vehicle_type)
            .ok_or_else(|| DomainError::Validation("Vehicle type is required".to_string()))?;
        let owner_name = optional(cmd.owner_name.as_deref())
            .unwrap_or(reservation.customer_name.trim())
            .to_string();

        reservation.check_in()?;
        self.ensure_not_parked(&vehicle_number).await?;

        let entry = NewEntry {
            vehicle_number,
            owner_name,
            vehicle_type,
            entry_time: self.clock.now(),
            slot_number: reservation.slot_number,
            reservation_flag: ReservationFlag::Yes,
        };
        let Some(entry) = self.repos.check_in_reservation(&reservation, entry).await? else {
            return Err(DomainError::Validation(format!(
                "Reservation {} is no longer active",
                id
            )));
        };

        metrics::counter!("parking_entries_total", "source" => "reservation").increment(1);
        info!(
            reservation_id = id,
            entry_id = entry.id,
            vehicle = %entry.vehicle_number,
            slot = entry.slot_number,
            "Reservation checked in"
        );

        Ok(entry)
    }

    /// Expire every Reserved reservation whose hold window has passed.
    /// Returns the number expired.
    pub async fn expire_overdue_reservations(&self) -> DomainResult<usize> {
        if !self.reservations.expires() {
            return Ok(0);
        }

        let _guard = self.allocation_lock.lock().await;

        let now = self.clock.now();
        let hold = self.reservations.hold();
        let overdue = self.repos.reservations().find_overdue(now - hold).await?;

        let mut expired = 0;
        for mut reservation in overdue {
            if !reservation.is_overdue(now, hold) {
                continue;
            }
            reservation.expire()?;
            match self.repos.reservations().update_status(&reservation).await {
                Ok(true) => {
                    expired += 1;
                    info!(
                        reservation_id = reservation.id,
                        slot = reservation.slot_number,
                        "Reservation expired"
                    );
                }
                Ok(false) => {}
                Err(e) => warn!(reservation_id = reservation.id, error = %e, "Failed to expire reservation"),
            }
        }

        Ok(expired)
    }

    // ── Helpers ────────────────────────────────────────────────

    /// The single Parked entry for a vehicle. Distinguishes a vehicle that
    /// has already left from one that was never here.
    async fn find_parked_vehicle(&self, vehicle_number: &str) -> DomainResult<ParkingEntry> {
        let key = normalize_vehicle_number(required(vehicle_number, "Vehicle number")?);
        let history = self.repos.entries().find_by_vehicle(&key).await?;

        let mut parked: Vec<ParkingEntry> = history.iter().filter(|e| e.is_parked()).cloned().collect();
        match parked.len() {
            1 => Ok(parked.remove(0)),
            0 => match history.first() {
                Some(latest) if !latest.is_parked() => Err(DomainError::AlreadyExited(key)),
                _ => Err(DomainError::not_found("ParkingEntry", "vehicle_number", key)),
            },
            n => {
                error!(vehicle = %key, count = n, "Vehicle parked in more than one slot");
                Err(DomainError::Integrity(format!(
                    "vehicle {} has {} parked entries",
                    key, n
                )))
            }
        }
    }

    async fn ensure_not_parked(&self, vehicle_number: &str) -> DomainResult<()> {
        let history = self.repos.entries().find_by_vehicle(vehicle_number).await?;
        if let Some(current) = history.iter().find(|e| e.is_parked()) {
            return Err(DomainError::Validation(format!(
                "Vehicle {} is already parked in slot {}",
                vehicle_number, current.slot_number
            )));
        }
        Ok(())
    }

    async fn persist_transition(&self, reservation: &Reservation) -> DomainResult<()> {
        if !self.repos.reservations().update_status(reservation).await? {
            return Err(DomainError::Validation(format!(
                "Reservation {} is no longer active",
                reservation.id
            )));
        }
        Ok(())
    }

    fn rejection(&self, e: AllocationError, total_slots: u32, operation: &'static str) -> DomainError {
        metrics::counter!("parking_capacity_rejections_total", "operation" => operation).increment(1);
        match e {
            AllocationError::Full => {
                warn!(total_slots, operation, "Parking is full");
                DomainError::CapacityExceeded { total_slots }
            }
            AllocationError::SlotUnavailable(slot) => DomainError::SlotUnavailable(slot),
        }
    }
}

fn required<'a>(value: &'a str, field: &str) -> DomainResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed)
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryStatus, ParkingSettings, ReservationStatus};
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::shared::ManualClock;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    struct Fixture {
        service: Arc<ParkingService>,
        repos: Arc<InMemoryRepositoryProvider>,
        clock: Arc<ManualClock>,
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    async fn fixture(total_slots: u32, rate: i64) -> Fixture {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let settings = ParkingSettings::new(total_slots, Decimal::from(rate), start()).unwrap();
        repos.settings().save(&settings).await.unwrap();
        unconfigured(repos)
    }

    fn unconfigured(repos: Arc<InMemoryRepositoryProvider>) -> Fixture {
        let clock = Arc::new(ManualClock::new(start()));
        let service = Arc::new(ParkingService::new(
            repos.clone(),
            clock.clone(),
            BillingPolicy::default(),
            ReservationPolicy::default(),
        ));
        Fixture { service, repos, clock }
    }

    fn walk_in(vehicle: &str) -> CreateEntryCommand {
        CreateEntryCommand {
            vehicle_number: vehicle.to_string(),
            owner_name: "Dana".into(),
            vehicle_type: VehicleType::Car,
        }
    }

    fn reserve_at(at: DateTime<Utc>, slot: Option<u32>) -> CreateReservationCommand {
        CreateReservationCommand {
            slot_number: slot,
            reservation_datetime: at,
            customer_name: "Rui".into(),
            vehicle_number: Some("mh-12-ab-1".into()),
            vehicle_type: Some(VehicleType::Bike),
        }
    }

    #[tokio::test]
    async fn entry_gets_lowest_free_slot_and_normalized_number() {
        let f = fixture(3, 10).await;
        let entry = f.service.create_entry(walk_in("  ka-01-1234 ")).await.unwrap();

        assert_eq!(entry.slot_number, 1);
        assert_eq!(entry.vehicle_number, "KA-01-1234");
        assert_eq!(entry.entry_time, start());
        assert_eq!(entry.reservation_flag, ReservationFlag::No);
        assert!(entry.is_parked());
    }

    #[tokio::test]
    async fn entry_without_settings_is_rejected() {
        let f = unconfigured(Arc::new(InMemoryRepositoryProvider::new()));
        let err = f.service.create_entry(walk_in("A")).await.unwrap_err();
        assert_eq!(err, DomainError::SettingsMissing);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let f = fixture(3, 10).await;
        let mut cmd = walk_in("   ");
        assert!(matches!(
            f.service.create_entry(cmd.clone()).await,
            Err(DomainError::Validation(_))
        ));
        cmd.vehicle_number = "A".into();
        cmd.owner_name = " ".into();
        assert!(matches!(
            f.service.create_entry(cmd).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn vehicle_cannot_park_twice() {
        let f = fixture(3, 10).await;
        f.service.create_entry(walk_in("A-1")).await.unwrap();
        let err = f.service.create_entry(walk_in("a-1")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn two_slot_lot_scenario() {
        let f = fixture(2, 10).await;

        let a = f.service.create_entry(walk_in("A")).await.unwrap();
        let b = f.service.create_entry(walk_in("B")).await.unwrap();
        assert_eq!((a.slot_number, b.slot_number), (1, 2));

        let err = f.service.create_entry(walk_in("C")).await.unwrap_err();
        assert_eq!(err, DomainError::CapacityExceeded { total_slots: 2 });

        f.clock.advance(Duration::minutes(45));
        f.service.checkout("a").await.unwrap();

        let c = f.service.create_entry(walk_in("C")).await.unwrap();
        assert_eq!(c.slot_number, 1);

        let availability = f.service.get_availability().await.unwrap();
        assert_eq!(availability.available, 0);
        assert_eq!(availability.occupied, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_entries_never_share_the_last_slot() {
        let f = fixture(1, 10).await;

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = f.service.clone();
            handles.push(tokio::spawn(async move {
                service.create_entry(walk_in(&format!("V-{}", i))).await
            }));
        }

        let mut parked = 0;
        let mut full = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(entry) => {
                    assert_eq!(entry.slot_number, 1);
                    parked += 1;
                }
                Err(DomainError::CapacityExceeded { .. }) => full += 1,
                Err(other) => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!((parked, full), (1, 7));
        assert_eq!(f.repos.entries().find_parked().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn checkout_bills_started_hours() {
        let f = fixture(2, 10).await;
        f.service.create_entry(walk_in("A")).await.unwrap();
        f.service.create_entry(walk_in("B")).await.unwrap();

        f.clock.advance(Duration::minutes(59));
        let first = f.service.checkout("A").await.unwrap();
        assert_eq!(first.bill.duration_hours, 1);
        assert_eq!(first.bill.total_amount, Decimal::from(10));

        f.clock.advance(Duration::minutes(2));
        let second = f.service.checkout("B").await.unwrap();
        assert_eq!(second.bill.duration_hours, 2);
        assert_eq!(second.bill.total_amount, Decimal::from(20));
    }

    #[tokio::test]
    async fn second_checkout_reports_already_exited_and_keeps_bill() {
        let f = fixture(2, 10).await;
        let entry = f.service.create_entry(walk_in("A")).await.unwrap();

        f.clock.advance(Duration::minutes(90));
        let outcome = f.service.checkout("A").await.unwrap();

        f.clock.advance(Duration::hours(5));
        let err = f.service.checkout("A").await.unwrap_err();
        assert_eq!(err, DomainError::AlreadyExited("A".into()));

        let stored = f.service.get_entry(entry.id).await.unwrap();
        assert_eq!(stored.status, outcome.entry.status);
        let record = stored.exit_record().unwrap();
        assert_eq!(record.duration_hours, 2);
        assert_eq!(record.total_amount, Decimal::from(20));
        assert_eq!(record.exit_time, start() + Duration::minutes(90));
    }

    #[tokio::test]
    async fn unknown_vehicle_is_not_found() {
        let f = fixture(2, 10).await;
        let err = f.service.checkout("NOPE").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn quote_does_not_end_the_stay() {
        let f = fixture(2, 10).await;
        f.service.create_entry(walk_in("A")).await.unwrap();
        f.clock.advance(Duration::minutes(130));

        let quote = f.service.quote_checkout("a").await.unwrap();
        assert_eq!(quote.bill.duration_hours, 3);
        assert_eq!(quote.entry.status, EntryStatus::Parked);
        assert_eq!(f.service.get_availability().await.unwrap().occupied, 1);
    }

    #[tokio::test]
    async fn reservation_claims_a_slot() {
        let f = fixture(2, 10).await;
        let r = f
            .service
            .create_reservation(reserve_at(start() + Duration::hours(1), None))
            .await
            .unwrap();
        assert_eq!(r.slot_number, 1);
        assert_eq!(r.vehicle_number.as_deref(), Some("MH-12-AB-1"));

        let entry = f.service.create_entry(walk_in("A")).await.unwrap();
        assert_eq!(entry.slot_number, 2);

        let availability = f.service.get_availability().await.unwrap();
        assert_eq!(
            availability,
            Availability {
                total: 2,
                occupied: 1,
                reserved: 1,
                available: 0,
            }
        );
    }

    #[tokio::test]
    async fn specific_slot_must_be_free() {
        let f = fixture(3, 10).await;
        f.service.create_entry(walk_in("A")).await.unwrap();

        let at = start() + Duration::hours(2);
        let err = f.service.create_reservation(reserve_at(at, Some(1))).await.unwrap_err();
        assert_eq!(err, DomainError::SlotUnavailable(1));
        let err = f.service.create_reservation(reserve_at(at, Some(9))).await.unwrap_err();
        assert_eq!(err, DomainError::SlotUnavailable(9));

        let r = f.service.create_reservation(reserve_at(at, Some(3))).await.unwrap();
        assert_eq!(r.slot_number, 3);
    }

    #[tokio::test]
    async fn cancelled_reservation_releases_its_slot() {
        let f = fixture(1, 10).await;
        let r = f
            .service
            .create_reservation(reserve_at(start() + Duration::hours(1), None))
            .await
            .unwrap();
        assert!(matches!(
            f.service.create_entry(walk_in("A")).await,
            Err(DomainError::CapacityExceeded { .. })
        ));

        let cancelled = f.service.cancel_reservation(r.id).await.unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        assert!(f.service.cancel_reservation(r.id).await.is_err());

        assert_eq!(f.service.create_entry(walk_in("A")).await.unwrap().slot_number, 1);
    }

    #[tokio::test]
    async fn check_in_parks_on_the_reserved_slot() {
        let f = fixture(3, 10).await;
        let r = f
            .service
            .create_reservation(reserve_at(start(), Some(2)))
            .await
            .unwrap();

        let entry = f
            .service
            .check_in_reservation(r.id, CheckInCommand::default())
            .await
            .unwrap();
        assert_eq!(entry.slot_number, 2);
        assert_eq!(entry.vehicle_number, "MH-12-AB-1");
        assert_eq!(entry.owner_name, "Rui");
        assert_eq!(entry.vehicle_type, VehicleType::Bike);
        assert_eq!(entry.reservation_flag, ReservationFlag::Yes);

        let stored = f.service.get_reservation(r.id).await.unwrap();
        assert_eq!(stored.status, ReservationStatus::CheckedIn);

        let availability = f.service.get_availability().await.unwrap();
        assert_eq!((availability.occupied, availability.reserved), (1, 0));

        assert!(f
            .service
            .check_in_reservation(r.id, CheckInCommand::default())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn check_in_needs_a_vehicle_number() {
        let f = fixture(3, 10).await;
        let mut cmd = reserve_at(start(), None);
        cmd.vehicle_number = None;
        let r = f.service.create_reservation(cmd).await.unwrap();

        let err = f
            .service
            .check_in_reservation(r.id, CheckInCommand::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(f.service.get_reservation(r.id).await.unwrap().is_active());
    }

    #[tokio::test]
    async fn failed_check_in_leaves_reservation_reserved() {
        let f = fixture(3, 10).await;
        let r = f
            .service
            .create_reservation(reserve_at(start(), Some(2)))
            .await
            .unwrap();

        // Slot 2 gets a parked row behind the service's back
        f.repos
            .entries()
            .create(NewEntry {
                vehicle_number: "KA-99".into(),
                owner_name: "Intruder".into(),
                vehicle_type: VehicleType::Car,
                entry_time: start(),
                slot_number: 2,
                reservation_flag: ReservationFlag::No,
            })
            .await
            .unwrap();

        let err = f
            .service
            .check_in_reservation(r.id, CheckInCommand::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Integrity(_)), "{:?}", err);

        let stored = f.service.get_reservation(r.id).await.unwrap();
        assert_eq!(stored.status, ReservationStatus::Reserved);
        assert!(f
            .repos
            .entries()
            .find_by_vehicle("MH-12-AB-1")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn overdue_reservations_expire() {
        let f = fixture(2, 10).await;
        let early = f
            .service
            .create_reservation(reserve_at(start(), None))
            .await
            .unwrap();
        let late = f
            .service
            .create_reservation(reserve_at(start() + Duration::hours(3), None))
            .await
            .unwrap();

        f.clock.advance(Duration::minutes(30));
        assert_eq!(f.service.expire_overdue_reservations().await.unwrap(), 0);

        f.clock.advance(Duration::minutes(1));
        assert_eq!(f.service.expire_overdue_reservations().await.unwrap(), 1);

        assert_eq!(
            f.service.get_reservation(early.id).await.unwrap().status,
            ReservationStatus::Expired
        );
        assert!(f.service.get_reservation(late.id).await.unwrap().is_active());
        assert_eq!(f.service.get_availability().await.unwrap().available, 1);
    }

    #[tokio::test]
    async fn reservation_past_hold_window_is_rejected() {
        let f = fixture(2, 10).await;
        let err = f
            .service
            .create_reservation(reserve_at(start() - Duration::hours(1), None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
