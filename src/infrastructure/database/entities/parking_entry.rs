//! Parking entry entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vehicle type column
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum VehicleType {
    #[sea_orm(string_value = "Bike")]
    Bike,
    #[sea_orm(string_value = "Car")]
    Car,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parking_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Upper-cased registration number
    pub vehicle_number: String,
    pub owner_name: String,
    pub vehicle_type: VehicleType,

    pub entry_time: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub exit_time: Option<DateTime<Utc>>,

    pub slot_number: i32,

    /// Parked or Exited
    pub status: String,

    /// Yes or No
    pub reservation_flag: String,

    #[sea_orm(nullable)]
    pub duration_hours: Option<i32>,

    /// Decimal text
    #[sea_orm(nullable)]
    pub total_amount: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
