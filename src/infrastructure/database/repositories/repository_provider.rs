//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use log::debug;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::domain::entry::{EntryRepository, NewEntry, ParkingEntry};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::{Reservation, ReservationRepository};
use crate::domain::settings::SettingsRepository;
use crate::domain::DomainResult;

use super::db_err;
use super::entry_repository::{insert_parked, SeaOrmEntryRepository};
use super::reservation_repository::{apply_status, SeaOrmReservationRepository};
use super::settings_repository::SeaOrmSettingsRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let parked = repos.entries().find_parked().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    settings: SeaOrmSettingsRepository,
    entries: SeaOrmEntryRepository,
    reservations: SeaOrmReservationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            settings: SeaOrmSettingsRepository::new(db.clone()),
            entries: SeaOrmEntryRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            db,
        }
    }
}

async fn check_in_within(
    txn: &DatabaseTransaction,
    reservation: &Reservation,
    entry: NewEntry,
) -> DomainResult<Option<ParkingEntry>> {
    if !apply_status(txn, reservation).await? {
        return Ok(None);
    }
    insert_parked(txn, entry).await.map(Some)
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
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
        debug!("Checking in reservation {} on slot {}", reservation.id, entry.slot_number);

        let txn = self.db.begin().await.map_err(db_err)?;
        match check_in_within(&txn, reservation, entry).await {
            Ok(Some(created)) => {
                txn.commit().await.map_err(db_err)?;
                Ok(Some(created))
            }
            other => {
                txn.rollback().await.map_err(db_err)?;
                other
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use sea_orm::{ConnectionTrait, Database};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::domain::entry::{EntryFilter, NewEntry, ReservationFlag, VehicleType};
    use crate::domain::reservation::{NewReservation, ReservationStatus};
    use crate::domain::settings::ParkingSettings;
    use crate::domain::{compute_bill, BillingPolicy, DomainError};
    use crate::infrastructure::database::migrator::Migrator;

    async fn store() -> SeaOrmRepositoryProvider {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmRepositoryProvider::new(db)
    }

    fn at(hour: u32, minute: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, hour, minute, 0).unwrap()
    }

    fn new_entry(vehicle: &str, slot: u32, hour: u32) -> NewEntry {
        NewEntry {
            vehicle_number: vehicle.to_string(),
            owner_name: "Asha Rao".to_string(),
            vehicle_type: VehicleType::Car,
            entry_time: at(hour, 0),
            slot_number: slot,
            reservation_flag: ReservationFlag::No,
        }
    }

    #[tokio::test]
    async fn settings_round_trip_keeps_decimal_rate() {
        let repos = store().await;
        assert!(repos.settings().get().await.unwrap().is_none());

        let rate = Decimal::new(2550, 2);
        repos
            .settings()
            .save(&ParkingSettings::new(12, rate, at(8, 0)).unwrap())
            .await
            .unwrap();
        repos
            .settings()
            .save(&ParkingSettings::new(15, rate, at(9, 0)).unwrap())
            .await
            .unwrap();

        let stored = repos.settings().get().await.unwrap().unwrap();
        assert_eq!(stored.total_slots, 15);
        assert_eq!(stored.rate_per_hour, rate);
    }

    #[tokio::test]
    async fn second_parked_entry_on_a_slot_is_an_integrity_error() {
        let repos = store().await;
        repos.entries().create(new_entry("KA01", 1, 9)).await.unwrap();

        let err = repos.entries().create(new_entry("KA02", 1, 9)).await.unwrap_err();
        assert!(matches!(err, DomainError::Integrity(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn checkout_applies_once_and_frees_the_slot() {
        let repos = store().await;
        let mut entry = repos.entries().create(new_entry("KA01", 1, 9)).await.unwrap();

        let bill = compute_bill(entry.entry_time, at(10, 1), Decimal::from(20), &BillingPolicy::default())
            .unwrap();
        entry.checkout(&bill).unwrap();
        assert!(repos.entries().complete_checkout(&entry).await.unwrap());
        assert!(!repos.entries().complete_checkout(&entry).await.unwrap());

        let stored = repos.entries().find_by_id(entry.id).await.unwrap().unwrap();
        let record = stored.exit_record().unwrap();
        assert_eq!(record.duration_hours, 2);
        assert_eq!(record.total_amount, Decimal::from(40));
        assert!(repos.entries().find_parked().await.unwrap().is_empty());

        // slot 1 can be claimed again
        repos.entries().create(new_entry("KA02", 1, 11)).await.unwrap();
    }

    #[tokio::test]
    async fn search_combines_filters_newest_first() {
        let repos = store().await;
        repos.entries().create(new_entry("KA01AB", 1, 8)).await.unwrap();
        repos.entries().create(new_entry("MH12XY", 2, 9)).await.unwrap();
        repos.entries().create(new_entry("KA05CD", 3, 10)).await.unwrap();

        let found = repos
            .entries()
            .search(&EntryFilter {
                vehicle_number: Some("ka0".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let plates: Vec<_> = found.iter().map(|e| e.vehicle_number.as_str()).collect();
        assert_eq!(plates, ["KA05CD", "KA01AB"]);

        let found = repos
            .entries()
            .search(&EntryFilter {
                vehicle_number: Some("KA".into()),
                slot_number: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let between = repos
            .entries()
            .find_entered_between(at(8, 30), at(10, 0))
            .await
            .unwrap();
        assert_eq!(between.len(), 2);
    }

    #[tokio::test]
    async fn reservation_status_change_is_conditional() {
        let repos = store().await;
        let mut reservation = repos
            .reservations()
            .create(NewReservation {
                slot_number: 4,
                reservation_datetime: at(12, 0),
                customer_name: "Ravi".into(),
                vehicle_number: None,
                vehicle_type: None,
                created_at: at(9, 0),
            })
            .await
            .unwrap();

        let overdue = repos
            .reservations()
            .find_overdue(at(12, 0) + Duration::minutes(1))
            .await
            .unwrap();
        assert_eq!(overdue.len(), 1);

        let stale = reservation.clone();
        reservation.cancel().unwrap();
        assert!(repos.reservations().update_status(&reservation).await.unwrap());

        let mut late = stale;
        late.expire().unwrap();
        assert!(!repos.reservations().update_status(&late).await.unwrap());

        let stored = repos.reservations().find_by_id(reservation.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Cancelled);
        assert!(repos.reservations().find_active().await.unwrap().is_empty());
        assert_eq!(repos.reservations().find_all().await.unwrap().len(), 1);
    }

    async fn reserve_slot(repos: &SeaOrmRepositoryProvider, slot: u32) -> crate::domain::Reservation {
        repos
            .reservations()
            .create(NewReservation {
                slot_number: slot,
                reservation_datetime: at(12, 0),
                customer_name: "Meera".into(),
                vehicle_number: Some("TN09ZZ".into()),
                vehicle_type: Some(VehicleType::Car),
                created_at: at(9, 0),
            })
            .await
            .unwrap()
    }

    fn arrival(slot: u32) -> NewEntry {
        NewEntry {
            reservation_flag: ReservationFlag::Yes,
            ..new_entry("TN09ZZ", slot, 12)
        }
    }

    #[tokio::test]
    async fn check_in_writes_status_and_entry_together() {
        let repos = store().await;
        let mut reservation = reserve_slot(&repos, 2).await;
        reservation.check_in().unwrap();

        let entry = repos
            .check_in_reservation(&reservation, arrival(2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.slot_number, 2);
        assert_eq!(entry.reservation_flag, ReservationFlag::Yes);

        let stored = repos.reservations().find_by_id(reservation.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::CheckedIn);

        // already checked in: nothing more is written
        assert!(repos
            .check_in_reservation(&reservation, arrival(3))
            .await
            .unwrap()
            .is_none());
        assert_eq!(repos.entries().find_parked().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn check_in_rolls_back_when_the_slot_is_taken() {
        let repos = store().await;
        let mut reservation = reserve_slot(&repos, 2).await;
        repos.entries().create(new_entry("KA01", 2, 10)).await.unwrap();
        reservation.check_in().unwrap();

        let err = repos
            .check_in_reservation(&reservation, arrival(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Integrity(_)), "{:?}", err);

        let stored = repos.reservations().find_by_id(reservation.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Reserved);
        assert!(repos.entries().find_by_vehicle("TN09ZZ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_treats_like_wildcards_literally() {
        let repos = store().await;
        repos.entries().create(new_entry("AB1", 1, 8)).await.unwrap();
        repos.entries().create(new_entry("XA_1", 2, 9)).await.unwrap();

        let plates = |filter: EntryFilter| {
            let repos = &repos;
            async move {
                repos
                    .entries()
                    .search(&filter)
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|e| e.vehicle_number)
                    .collect::<Vec<_>>()
            }
        };

        let underscore = plates(EntryFilter {
            vehicle_number: Some("a_1".into()),
            ..Default::default()
        })
        .await;
        assert_eq!(underscore, ["XA_1"]);

        let percent = plates(EntryFilter {
            vehicle_number: Some("%".into()),
            ..Default::default()
        })
        .await;
        assert!(percent.is_empty());

        let owner = plates(EntryFilter {
            owner_name: Some("a%r".into()),
            ..Default::default()
        })
        .await;
        assert!(owner.is_empty());
    }

    #[tokio::test]
    async fn unknown_stored_reservation_flag_is_an_integrity_error() {
        let repos = store().await;
        let entry = repos.entries().create(new_entry("KA01AB", 1, 8)).await.unwrap();
        repos
            .db
            .execute_unprepared("UPDATE parking_entries SET reservation_flag = 'Maybe'")
            .await
            .unwrap();

        let err = repos.entries().find_by_id(entry.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Integrity(_)), "{:?}", err);
    }
}
