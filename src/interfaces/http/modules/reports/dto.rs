//! Report DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::services::{HourlyCount, PeriodSummary};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// daily, weekly or monthly (default daily)
    pub period: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HourlyCountDto {
    /// Hour of day, 0-23 (UTC)
    pub hour: u32,
    pub vehicles: u32,
}

impl From<HourlyCount> for HourlyCountDto {
    fn from(h: HourlyCount) -> Self {
        Self {
            hour: h.hour,
            vehicles: h.vehicles,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryDto {
    pub period: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub total_vehicles: u32,
    pub exited_vehicles: u32,
    pub revenue: String,
    pub cars: u32,
    pub bikes: u32,
    pub walk_ins: u32,
    pub reservations: u32,
    /// Hours with at least one entry
    pub hourly: Vec<HourlyCountDto>,
}

impl From<PeriodSummary> for SummaryDto {
    fn from(s: PeriodSummary) -> Self {
        Self {
            period: s.period.as_str().to_string(),
            from: s.from,
            to: s.to,
            total_vehicles: s.total_vehicles,
            exited_vehicles: s.exited_vehicles,
            revenue: s.revenue.to_string(),
            cars: s.cars,
            bikes: s.bikes,
            walk_ins: s.walk_ins,
            reservations: s.reservations,
            hourly: s.hourly.into_iter().map(Into::into).collect(),
        }
    }
}
