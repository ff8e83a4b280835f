//! Entry REST API handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::{CreateEntryRequest, EntryDto, EntrySearchQuery};
use crate::application::{CreateEntryCommand, ParkingService, ReportService};
use crate::interfaces::http::common::{domain_error, ok, ApiError, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct EntryState {
    pub parking: Arc<ParkingService>,
    pub reports: Arc<ReportService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/entries",
    tag = "Entries",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Vehicle parked on the lowest free slot", body = ApiResponse<EntryDto>),
        (status = 409, description = "Lot is full, not configured, or vehicle already parked"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn create_entry(
    State(state): State<EntryState>,
    ValidatedJson(request): ValidatedJson<CreateEntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EntryDto>>), ApiError> {
    let entry = state
        .parking
        .create_entry(CreateEntryCommand {
            vehicle_number: request.vehicle_number,
            owner_name: request.owner_name,
            vehicle_type: request.vehicle_type.into(),
        })
        .await
        .map_err(domain_error)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(entry.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/entries",
    tag = "Entries",
    params(EntrySearchQuery),
    responses(
        (status = 200, description = "Matching entries, newest first", body = ApiResponse<Vec<EntryDto>>)
    )
)]
pub async fn search_entries(
    State(state): State<EntryState>,
    Query(query): Query<EntrySearchQuery>,
) -> ApiResult<Vec<EntryDto>> {
    let entries = state
        .reports
        .search(&query.into())
        .await
        .map_err(domain_error)?;
    ok(entries.into_iter().map(Into::into).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/entries/{id}",
    tag = "Entries",
    params(("id" = i32, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "Entry details", body = ApiResponse<EntryDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_entry(State(state): State<EntryState>, Path(id): Path<i32>) -> ApiResult<EntryDto> {
    let entry = state.parking.get_entry(id).await.map_err(domain_error)?;
    ok(entry.into())
}
