//! Entry DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{EntryFilter, EntryStatus, ParkingEntry, VehicleType};

/// Vehicle category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum VehicleTypeDto {
    Bike,
    Car,
}

impl From<VehicleTypeDto> for VehicleType {
    fn from(v: VehicleTypeDto) -> Self {
        match v {
            VehicleTypeDto::Bike => VehicleType::Bike,
            VehicleTypeDto::Car => VehicleType::Car,
        }
    }
}

impl From<VehicleType> for VehicleTypeDto {
    fn from(v: VehicleType) -> Self {
        match v {
            VehicleType::Bike => VehicleTypeDto::Bike,
            VehicleType::Car => VehicleTypeDto::Car,
        }
    }
}

/// Register a walk-in vehicle. The slot is assigned by the server.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEntryRequest {
    /// Registration number, matched case-insensitively
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    #[schema(example = "KA-01-AB-1234")]
    pub vehicle_number: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    #[schema(example = "Priya Nair")]
    pub owner_name: String,
    pub vehicle_type: VehicleTypeDto,
}

/// Parking entry in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntryDto {
    pub id: i32,
    pub vehicle_number: String,
    pub owner_name: String,
    pub vehicle_type: VehicleTypeDto,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub slot_number: u32,
    /// "Parked" or "Exited"
    pub status: String,
    /// "Yes" when the entry came from a reservation check-in
    pub reservation_flag: String,
    /// Billed hours, set once exited
    pub duration_hours: Option<u32>,
    /// Fee as a decimal string, set once exited
    pub total_amount: Option<String>,
}

impl From<ParkingEntry> for EntryDto {
    fn from(e: ParkingEntry) -> Self {
        let (exit_time, duration_hours, total_amount) = match &e.status {
            EntryStatus::Parked => (None, None, None),
            EntryStatus::Exited(r) => (
                Some(r.exit_time),
                Some(r.duration_hours),
                Some(r.total_amount.to_string()),
            ),
        };
        Self {
            id: e.id,
            status: e.status.as_str().to_string(),
            reservation_flag: e.reservation_flag.as_str().to_string(),
            vehicle_number: e.vehicle_number,
            owner_name: e.owner_name,
            vehicle_type: e.vehicle_type.into(),
            entry_time: e.entry_time,
            exit_time,
            slot_number: e.slot_number,
            duration_hours,
            total_amount,
        }
    }
}

/// Search filters. All are optional and combine with AND.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EntrySearchQuery {
    /// Substring of the registration number (case-insensitive)
    pub vehicle_number: Option<String>,
    /// Substring of the owner name (case-insensitive)
    pub owner_name: Option<String>,
    pub slot_number: Option<u32>,
    /// First entry date, inclusive (YYYY-MM-DD, UTC)
    pub from: Option<NaiveDate>,
    /// Last entry date, inclusive (YYYY-MM-DD, UTC)
    pub to: Option<NaiveDate>,
}

impl From<EntrySearchQuery> for EntryFilter {
    fn from(q: EntrySearchQuery) -> Self {
        EntryFilter {
            vehicle_number: q.vehicle_number,
            owner_name: q.owner_name,
            slot_number: q.slot_number,
            from: q.from,
            to: q.to,
        }
    }
}
