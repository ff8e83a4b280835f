//! Occupancy REST API handlers

use std::sync::Arc;

use axum::extract::State;

use super::dto::{AvailabilityDto, DashboardDto};
use crate::application::{ParkingService, ReportService};
use crate::interfaces::http::common::{domain_error, ok, ApiResponse, ApiResult};

#[derive(Clone)]
pub struct OccupancyState {
    pub parking: Arc<ParkingService>,
    pub reports: Arc<ReportService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/availability",
    tag = "Occupancy",
    responses(
        (status = 200, description = "Slot counts", body = ApiResponse<AvailabilityDto>),
        (status = 409, description = "Lot not configured")
    )
)]
pub async fn get_availability(State(state): State<OccupancyState>) -> ApiResult<AvailabilityDto> {
    let availability = state.parking.get_availability().await.map_err(domain_error)?;
    ok(availability.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Occupancy",
    responses(
        (status = 200, description = "Front-desk summary", body = ApiResponse<DashboardDto>),
        (status = 409, description = "Lot not configured")
    )
)]
pub async fn get_dashboard(State(state): State<OccupancyState>) -> ApiResult<DashboardDto> {
    let dashboard = state.reports.dashboard().await.map_err(domain_error)?;
    ok(dashboard.into())
}
