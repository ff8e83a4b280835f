//! Settings DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::ParkingSettings;

/// Create or replace the lot configuration
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsRequest {
    #[validate(range(min = 1, max = 100000, message = "must be between 1 and 100000"))]
    #[schema(example = 50)]
    pub total_slots: u32,
    /// Positive amount per started hour; accepts a number or a decimal string
    #[schema(value_type = String, example = "20.00")]
    pub rate_per_hour: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettingsDto {
    pub total_slots: u32,
    #[schema(example = "20.00")]
    pub rate_per_hour: String,
    #[schema(example = "INR")]
    pub currency: String,
    pub updated_at: DateTime<Utc>,
}

impl SettingsDto {
    pub fn new(s: ParkingSettings, currency: &str) -> Self {
        Self {
            total_slots: s.total_slots,
            rate_per_hour: s.rate_per_hour.to_string(),
            currency: currency.to_string(),
            updated_at: s.updated_at,
        }
    }
}
