//! Occupancy DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::services::Dashboard;
use crate::domain::Availability;
use crate::interfaces::http::modules::entries::EntryDto;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityDto {
    pub total: u32,
    /// Slots held by parked vehicles
    pub occupied: u32,
    /// Slots held by active reservations
    pub reserved: u32,
    /// Free slots, never negative
    pub available: u32,
}

impl From<Availability> for AvailabilityDto {
    fn from(a: Availability) -> Self {
        Self {
            total: a.total,
            occupied: a.occupied,
            reserved: a.reserved,
            available: a.available,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardDto {
    pub availability: AvailabilityDto,
    /// Vehicles that entered today (UTC)
    pub today_entries: u32,
    /// Fees of today's entries that have exited
    pub today_revenue: String,
    /// Most recently parked vehicles still on the lot
    pub recent_parked: Vec<EntryDto>,
}

impl From<Dashboard> for DashboardDto {
    fn from(d: Dashboard) -> Self {
        Self {
            availability: d.availability.into(),
            today_entries: d.today_entries,
            today_revenue: d.today_revenue.to_string(),
            recent_parked: d.recent_parked.into_iter().map(Into::into).collect(),
        }
    }
}
