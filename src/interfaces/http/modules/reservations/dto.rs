//! Reservation DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Reservation;
use crate::interfaces::http::modules::entries::VehicleTypeDto;

/// Hold a slot for an expected vehicle
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    /// Specific slot to hold; omit for the lowest free slot
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub slot_number: Option<u32>,
    /// Expected arrival (ISO 8601)
    pub reservation_datetime: DateTime<Utc>,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub customer_name: String,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub vehicle_number: Option<String>,
    pub vehicle_type: Option<VehicleTypeDto>,
}

/// Arrival details; any field left out is taken from the reservation
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CheckInRequest {
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub vehicle_number: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub owner_name: Option<String>,
    pub vehicle_type: Option<VehicleTypeDto>,
}

/// Reservation details in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    pub slot_number: u32,
    pub reservation_datetime: DateTime<Utc>,
    pub customer_name: String,
    pub vehicle_number: Option<String>,
    pub vehicle_type: Option<VehicleTypeDto>,
    /// Reserved, CheckedIn, Cancelled or Expired
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            slot_number: r.slot_number,
            reservation_datetime: r.reservation_datetime,
            customer_name: r.customer_name,
            vehicle_number: r.vehicle_number,
            vehicle_type: r.vehicle_type.map(Into::into),
            status: r.status.as_str().to_string(),
            created_at: r.created_at,
        }
    }
}
