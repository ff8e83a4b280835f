//! In-memory record store for development and testing

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::{
    DomainError, DomainResult, EntryFilter, EntryRepository, NewEntry, NewReservation,
    ParkingEntry, ParkingSettings, RepositoryProvider, Reservation, ReservationRepository,
    SettingsRepository,
};

/// Repository provider backed by process memory.
///
/// Enforces the same uniqueness rules as the SQLite schema: one Parked entry
/// per slot and one Reserved reservation per slot.
pub struct InMemoryRepositoryProvider {
    settings: InMemorySettingsRepository,
    entries: InMemoryEntryRepository,
    reservations: InMemoryReservationRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            settings: InMemorySettingsRepository::default(),
            entries: InMemoryEntryRepository::default(),
            reservations: InMemoryReservationRepository::default(),
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    fn settings(&self) -> &dyn SettingsRepository {
        &self.settings
    }

    fn entries(&self) -> &dyn EntryRepository {
        &self.entries
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    async fn check_in_reservation(
        &self,
        reservation: &Reservation,
        entry: NewEntry,
    ) -> DomainResult<Option<ParkingEntry>> {
        // The reservation row stays locked until both writes are done
        let Some(mut stored) = self.reservations.reservations.get_mut(&reservation.id) else {
            return Err(DomainError::not_found("Reservation", "id", reservation.id));
        };
        if !stored.is_active() {
            return Ok(None);
        }
        let created = self.entries.insert_parked(entry)?;
        stored.status = reservation.status;
        Ok(Some(created))
    }
}

fn poisoned() -> DomainError {
    DomainError::Storage("in-memory store lock poisoned".to_string())
}

// ── Settings ────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemorySettingsRepository {
    current: RwLock<Option<ParkingSettings>>,
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn get(&self) -> DomainResult<Option<ParkingSettings>> {
        Ok(self.current.read().map_err(|_| poisoned())?.clone())
    }

    async fn save(&self, settings: &ParkingSettings) -> DomainResult<()> {
        *self.current.write().map_err(|_| poisoned())? = Some(settings.clone());
        Ok(())
    }
}

// ── Entries ─────────────────────────────────────────────────────

pub struct InMemoryEntryRepository {
    entries: DashMap<i32, ParkingEntry>,
    counter: AtomicI32,
    insert_lock: Mutex<()>,
}

impl Default for InMemoryEntryRepository {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
            counter: AtomicI32::new(1),
            insert_lock: Mutex::new(()),
        }
    }
}

impl InMemoryEntryRepository {
    fn collect_newest_first(&self, keep: impl Fn(&ParkingEntry) -> bool) -> Vec<ParkingEntry> {
        let mut out: Vec<ParkingEntry> = self
            .entries
            .iter()
            .filter(|e| keep(e.value()))
            .map(|e| e.value().clone())
            .collect();
        out.sort_by(|a, b| b.entry_time.cmp(&a.entry_time).then(b.id.cmp(&a.id)));
        out
    }

    fn insert_parked(&self, entry: NewEntry) -> DomainResult<ParkingEntry> {
        let _guard = self.insert_lock.lock().map_err(|_| poisoned())?;

        let taken = self
            .entries
            .iter()
            .any(|e| e.is_parked() && e.slot_number == entry.slot_number);
        if taken {
            return Err(DomainError::Integrity(format!(
                "slot {} already has a parked entry",
                entry.slot_number
            )));
        }

        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let created = ParkingEntry::from_new(id, entry);
        self.entries.insert(id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn create(&self, entry: NewEntry) -> DomainResult<ParkingEntry> {
        self.insert_parked(entry)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingEntry>> {
        Ok(self.entries.get(&id).map(|e| e.clone()))
    }

    async fn find_parked(&self) -> DomainResult<Vec<ParkingEntry>> {
        Ok(self.collect_newest_first(|e| e.is_parked()))
    }

    async fn find_by_vehicle(&self, vehicle_number: &str) -> DomainResult<Vec<ParkingEntry>> {
        Ok(self.collect_newest_first(|e| e.matches_vehicle(vehicle_number)))
    }

    async fn complete_checkout(&self, entry: &ParkingEntry) -> DomainResult<bool> {
        let Some(mut stored) = self.entries.get_mut(&entry.id) else {
            return Err(DomainError::not_found("ParkingEntry", "id", entry.id));
        };
        if !stored.is_parked() {
            return Ok(false);
        }
        stored.status = entry.status.clone();
        Ok(true)
    }

    async fn search(&self, filter: &EntryFilter) -> DomainResult<Vec<ParkingEntry>> {
        Ok(self.collect_newest_first(|e| filter.matches(e)))
    }

    async fn find_entered_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<ParkingEntry>> {
        Ok(self.collect_newest_first(|e| e.entry_time >= from && e.entry_time <= to))
    }
}

// ── Reservations ────────────────────────────────────────────────

pub struct InMemoryReservationRepository {
    reservations: DashMap<i32, Reservation>,
    counter: AtomicI32,
    insert_lock: Mutex<()>,
}

impl Default for InMemoryReservationRepository {
    fn default() -> Self {
        Self {
            reservations: DashMap::new(),
            counter: AtomicI32::new(1),
            insert_lock: Mutex::new(()),
        }
    }
}

impl InMemoryReservationRepository {
    fn collect_latest_first(&self, keep: impl Fn(&Reservation) -> bool) -> Vec<Reservation> {
        let mut out: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect();
        out.sort_by(|a, b| {
            b.reservation_datetime
                .cmp(&a.reservation_datetime)
                .then(b.id.cmp(&a.id))
        });
        out
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn create(&self, reservation: NewReservation) -> DomainResult<Reservation> {
        let _guard = self.insert_lock.lock().map_err(|_| poisoned())?;

        let taken = self
            .reservations
            .iter()
            .any(|r| r.is_active() && r.slot_number == reservation.slot_number);
        if taken {
            return Err(DomainError::Integrity(format!(
                "slot {} already has an active reservation",
                reservation.slot_number
            )));
        }

        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let created = Reservation::from_new(id, reservation);
        self.reservations.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn find_active(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect_latest_first(|r| r.is_active()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect_latest_first(|_| true))
    }

    async fn find_scheduled_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect_latest_first(|r| {
            r.reservation_datetime >= from && r.reservation_datetime <= to
        }))
    }

    async fn find_overdue(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect_latest_first(|r| r.is_active() && r.reservation_datetime < cutoff))
    }

    async fn update_status(&self, reservation: &Reservation) -> DomainResult<bool> {
        let Some(mut stored) = self.reservations.get_mut(&reservation.id) else {
            return Err(DomainError::not_found("Reservation", "id", reservation.id));
        };
        if !stored.is_active() {
            return Ok(false);
        }
        stored.status = reservation.status;
        Ok(true)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReservationFlag, VehicleType};

    fn new_entry(vehicle: &str, slot: u32) -> NewEntry {
        NewEntry {
            vehicle_number: vehicle.to_string(),
            owner_name: "Owner".into(),
            vehicle_type: VehicleType::Bike,
            entry_time: Utc::now(),
            slot_number: slot,
            reservation_flag: ReservationFlag::No,
        }
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let repos = InMemoryRepositoryProvider::new();
        let a = repos.entries().create(new_entry("A-1", 1)).await.unwrap();
        let b = repos.entries().create(new_entry("B-2", 2)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[tokio::test]
    async fn second_parked_entry_on_slot_is_rejected() {
        let repos = InMemoryRepositoryProvider::new();
        repos.entries().create(new_entry("A-1", 1)).await.unwrap();
        let err = repos.entries().create(new_entry("B-2", 1)).await.unwrap_err();
        assert!(matches!(err, DomainError::Integrity(_)));
    }

    #[tokio::test]
    async fn checkout_applies_once() {
        let repos = InMemoryRepositoryProvider::new();
        let mut entry = repos.entries().create(new_entry("A-1", 1)).await.unwrap();
        entry.status = crate::domain::EntryStatus::Exited(crate::domain::ExitRecord {
            exit_time: Utc::now(),
            duration_hours: 1,
            total_amount: rust_decimal::Decimal::from(5),
        });

        assert!(repos.entries().complete_checkout(&entry).await.unwrap());
        assert!(!repos.entries().complete_checkout(&entry).await.unwrap());
        assert!(repos.entries().find_parked().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn settings_roundtrip() {
        let repos = InMemoryRepositoryProvider::new();
        assert!(repos.settings().get().await.unwrap().is_none());

        let s = ParkingSettings::new(3, rust_decimal::Decimal::from(4), Utc::now()).unwrap();
        repos.settings().save(&s).await.unwrap();
        assert_eq!(repos.settings().get().await.unwrap(), Some(s));
    }
}
