//! SeaORM implementation of EntryRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Select, Set,
};

use super::{db_err, parse_decimal, slot_from_db};
use crate::domain::entry::{
    EntryFilter, EntryRepository, EntryStatus, ExitRecord, NewEntry, ParkingEntry,
    ReservationFlag, VehicleType,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::parking_entry;

const PARKED: &str = "Parked";
const EXITED: &str = "Exited";

pub struct SeaOrmEntryRepository {
    db: DatabaseConnection,
}

impl SeaOrmEntryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch(&self, query: Select<parking_entry::Entity>) -> DomainResult<Vec<ParkingEntry>> {
        query
            .order_by_desc(parking_entry::Column::EntryTime)
            .order_by_desc(parking_entry::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn vehicle_type_to_entity(t: VehicleType) -> parking_entry::VehicleType {
    match t {
        VehicleType::Bike => parking_entry::VehicleType::Bike,
        VehicleType::Car => parking_entry::VehicleType::Car,
    }
}

pub(crate) fn vehicle_type_to_domain(t: parking_entry::VehicleType) -> VehicleType {
    match t {
        parking_entry::VehicleType::Bike => VehicleType::Bike,
        parking_entry::VehicleType::Car => VehicleType::Car,
    }
}

fn slot_to_db(slot: u32) -> DomainResult<i32> {
    i32::try_from(slot).map_err(|_| DomainError::Validation(format!("Slot {} is out of range", slot)))
}

const LIKE_ESCAPE: char = '!';

/// LIKE pattern matching `needle` anywhere, with `%` and `_` taken literally
fn substring(needle: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

fn model_to_domain(m: parking_entry::Model) -> DomainResult<ParkingEntry> {
    let status = match m.status.as_str() {
        PARKED => EntryStatus::Parked,
        EXITED => {
            let (Some(exit_time), Some(hours), Some(amount)) =
                (m.exit_time, m.duration_hours, m.total_amount.as_deref())
            else {
                return Err(DomainError::Integrity(format!(
                    "exited entry {} is missing billing fields",
                    m.id
                )));
            };
            EntryStatus::Exited(ExitRecord {
                exit_time,
                duration_hours: u32::try_from(hours).map_err(|_| {
                    DomainError::Integrity(format!("entry {} has negative duration", m.id))
                })?,
                total_amount: parse_decimal(amount, "parking_entries.total_amount")?,
            })
        }
        other => {
            return Err(DomainError::Integrity(format!(
                "entry {} has unknown status '{}'",
                m.id, other
            )))
        }
    };

    let reservation_flag = ReservationFlag::parse(&m.reservation_flag).ok_or_else(|| {
        DomainError::Integrity(format!(
            "entry {} has unknown reservation flag '{}'",
            m.id, m.reservation_flag
        ))
    })?;

    Ok(ParkingEntry {
        id: m.id,
        vehicle_number: m.vehicle_number,
        owner_name: m.owner_name,
        vehicle_type: vehicle_type_to_domain(m.vehicle_type),
        entry_time: m.entry_time,
        slot_number: slot_from_db(m.slot_number)?,
        reservation_flag,
        status,
    })
}

/// Insert a Parked entry on any connection, including an open transaction
pub(crate) async fn insert_parked<C: ConnectionTrait>(
    conn: &C,
    e: NewEntry,
) -> DomainResult<ParkingEntry> {
    debug!("Creating entry: {} on slot {}", e.vehicle_number, e.slot_number);

    let model = parking_entry::ActiveModel {
        vehicle_number: Set(e.vehicle_number.clone()),
        owner_name: Set(e.owner_name.clone()),
        vehicle_type: Set(vehicle_type_to_entity(e.vehicle_type)),
        entry_time: Set(e.entry_time),
        exit_time: Set(None),
        slot_number: Set(slot_to_db(e.slot_number)?),
        status: Set(PARKED.to_string()),
        reservation_flag: Set(e.reservation_flag.as_str().to_string()),
        duration_hours: Set(None),
        total_amount: Set(None),
        ..Default::default()
    };
    let inserted = model.insert(conn).await.map_err(db_err)?;
    Ok(ParkingEntry::from_new(inserted.id, e))
}

// ── EntryRepository impl ────────────────────────────────────────

#[async_trait]
impl EntryRepository for SeaOrmEntryRepository {
    async fn create(&self, e: NewEntry) -> DomainResult<ParkingEntry> {
        insert_parked(&self.db, e).await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingEntry>> {
        parking_entry::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_parked(&self) -> DomainResult<Vec<ParkingEntry>> {
        self.fetch(parking_entry::Entity::find().filter(parking_entry::Column::Status.eq(PARKED)))
            .await
    }

    async fn find_by_vehicle(&self, vehicle_number: &str) -> DomainResult<Vec<ParkingEntry>> {
        self.fetch(
            parking_entry::Entity::find()
                .filter(parking_entry::Column::VehicleNumber.eq(vehicle_number)),
        )
        .await
    }

    async fn complete_checkout(&self, entry: &ParkingEntry) -> DomainResult<bool> {
        let Some(record) = entry.exit_record() else {
            return Err(DomainError::Integrity(format!(
                "checkout of entry {} carries no billing",
                entry.id
            )));
        };
        debug!(
            "Completing checkout: entry {} ({} h, {})",
            entry.id, record.duration_hours, record.total_amount
        );

        let hours = i32::try_from(record.duration_hours).map_err(|_| {
            DomainError::Integrity(format!("duration {} h out of range", record.duration_hours))
        })?;

        let result = parking_entry::Entity::update_many()
            .col_expr(parking_entry::Column::Status, Expr::value(EXITED))
            .col_expr(parking_entry::Column::ExitTime, Expr::value(record.exit_time))
            .col_expr(parking_entry::Column::DurationHours, Expr::value(hours))
            .col_expr(
                parking_entry::Column::TotalAmount,
                Expr::value(record.total_amount.to_string()),
            )
            .filter(parking_entry::Column::Id.eq(entry.id))
            .filter(parking_entry::Column::Status.eq(PARKED))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            let exists = parking_entry::Entity::find_by_id(entry.id)
                .one(&self.db)
                .await
                .map_err(db_err)?
                .is_some();
            if !exists {
                return Err(DomainError::not_found("ParkingEntry", "id", entry.id));
            }
            return Ok(false);
        }
        Ok(true)
    }

    async fn search(&self, filter: &EntryFilter) -> DomainResult<Vec<ParkingEntry>> {
        let mut cond = Condition::all();

        if let Some(v) = filter.vehicle_number.as_deref().filter(|v| !v.is_empty()) {
            cond = cond.add(parking_entry::Column::VehicleNumber.like(substring(&v.to_uppercase())));
        }
        // SQLite LIKE is case-insensitive for ASCII
        if let Some(o) = filter.owner_name.as_deref().filter(|o| !o.is_empty()) {
            cond = cond.add(parking_entry::Column::OwnerName.like(substring(o)));
        }
        if let Some(slot) = filter.slot_number {
            cond = cond.add(parking_entry::Column::SlotNumber.eq(slot_to_db(slot)?));
        }
        if let Some(from) = filter.entered_from() {
            cond = cond.add(parking_entry::Column::EntryTime.gte(from));
        }
        if let Some(to) = filter.entered_to() {
            cond = cond.add(parking_entry::Column::EntryTime.lte(to));
        }

        self.fetch(parking_entry::Entity::find().filter(cond)).await
    }

    async fn find_entered_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<ParkingEntry>> {
        self.fetch(
            parking_entry::Entity::find()
                .filter(parking_entry::Column::EntryTime.gte(from))
                .filter(parking_entry::Column::EntryTime.lte(to)),
        )
        .await
    }
}
