//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::entry_repository::{vehicle_type_to_domain, vehicle_type_to_entity};
use super::{db_err, slot_from_db};
use crate::domain::reservation::{
    NewReservation, Reservation, ReservationRepository, ReservationStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch(&self, query: Select<reservation::Entity>) -> DomainResult<Vec<Reservation>> {
        query
            .order_by_desc(reservation::Column::ReservationDatetime)
            .order_by_desc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }
}

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let status = ReservationStatus::parse(&m.status).ok_or_else(|| {
        DomainError::Integrity(format!(
            "reservation {} has unknown status '{}'",
            m.id, m.status
        ))
    })?;

    Ok(Reservation {
        id: m.id,
        slot_number: slot_from_db(m.slot_number)?,
        reservation_datetime: m.reservation_datetime,
        customer_name: m.customer_name,
        vehicle_number: m.vehicle_number,
        vehicle_type: m.vehicle_type.map(vehicle_type_to_domain),
        status,
        created_at: m.created_at,
    })
}

/// Write `r.status` only while the stored row is still Reserved. Returns
/// `false` when another transition got there first.
pub(crate) async fn apply_status<C: ConnectionTrait>(conn: &C, r: &Reservation) -> DomainResult<bool> {
    debug!("Updating reservation {} status to {}", r.id, r.status);

    let result = reservation::Entity::update_many()
        .col_expr(reservation::Column::Status, Expr::value(r.status.as_str()))
        .filter(reservation::Column::Id.eq(r.id))
        .filter(reservation::Column::Status.eq(ReservationStatus::Reserved.as_str()))
        .exec(conn)
        .await
        .map_err(db_err)?;

    if result.rows_affected == 0 {
        let exists = reservation::Entity::find_by_id(r.id)
            .one(conn)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Reservation", "id", r.id));
        }
        return Ok(false);
    }
    Ok(true)
}

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn create(&self, r: NewReservation) -> DomainResult<Reservation> {
        debug!(
            "Creating reservation: slot {} for {} at {}",
            r.slot_number, r.customer_name, r.reservation_datetime
        );

        let slot = i32::try_from(r.slot_number)
            .map_err(|_| DomainError::Validation(format!("Slot {} is out of range", r.slot_number)))?;

        let model = reservation::ActiveModel {
            slot_number: Set(slot),
            reservation_datetime: Set(r.reservation_datetime),
            customer_name: Set(r.customer_name.clone()),
            vehicle_number: Set(r.vehicle_number.clone()),
            vehicle_type: Set(r.vehicle_type.map(vehicle_type_to_entity)),
            status: Set(ReservationStatus::Reserved.as_str().to_string()),
            created_at: Set(r.created_at),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(Reservation::from_new(inserted.id, r))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_active(&self) -> DomainResult<Vec<Reservation>> {
        self.fetch(
            reservation::Entity::find()
                .filter(reservation::Column::Status.eq(ReservationStatus::Reserved.as_str())),
        )
        .await
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        self.fetch(reservation::Entity::find()).await
    }

    async fn find_scheduled_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        self.fetch(
            reservation::Entity::find()
                .filter(reservation::Column::ReservationDatetime.gte(from))
                .filter(reservation::Column::ReservationDatetime.lte(to)),
        )
        .await
    }

    async fn find_overdue(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Reservation>> {
        self.fetch(
            reservation::Entity::find()
                .filter(reservation::Column::Status.eq(ReservationStatus::Reserved.as_str()))
                .filter(reservation::Column::ReservationDatetime.lt(cutoff)),
        )
        .await
    }

    async fn update_status(&self, r: &Reservation) -> DomainResult<bool> {
        apply_status(&self.db, r).await
    }
}
