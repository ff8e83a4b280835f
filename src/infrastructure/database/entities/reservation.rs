//! Reservation entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::parking_entry::VehicleType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub slot_number: i32,

    pub reservation_datetime: DateTime<Utc>,

    pub customer_name: String,

    #[sea_orm(nullable)]
    pub vehicle_number: Option<String>,

    #[sea_orm(nullable)]
    pub vehicle_type: Option<VehicleType>,

    /// Reservation status: Reserved, CheckedIn, Cancelled, Expired
    pub status: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
