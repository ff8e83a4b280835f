//! Checkout DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::CheckoutOutcome;
use crate::interfaces::http::modules::entries::EntryDto;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    #[schema(example = "KA-01-AB-1234")]
    pub vehicle_number: String,
}

/// Fee for a stay. For a quote `exit_time` is the time of the request and
/// the entry is still Parked.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BillDto {
    pub entry: EntryDto,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    /// Whole elapsed minutes
    pub duration_minutes: i64,
    /// Billed hours (started hours, at least the configured minimum)
    pub duration_hours: u32,
    #[schema(example = "20.00")]
    pub rate_per_hour: String,
    #[schema(example = "40.00")]
    pub total_amount: String,
    #[schema(example = "INR")]
    pub currency: String,
}

impl BillDto {
    pub fn new(outcome: CheckoutOutcome, currency: &str) -> Self {
        let bill = outcome.bill;
        Self {
            entry: outcome.entry.into(),
            entry_time: bill.entry_time,
            exit_time: bill.exit_time,
            duration_minutes: bill.duration_minutes,
            duration_hours: bill.duration_hours,
            rate_per_hour: bill.rate_per_hour.to_string(),
            total_amount: bill.total_amount.to_string(),
            currency: currency.to_string(),
        }
    }
}
