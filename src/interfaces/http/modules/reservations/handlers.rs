//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::{CheckInRequest, CreateReservationRequest, ReservationDto};
use crate::application::{CheckInCommand, CreateReservationCommand, ParkingService};
use crate::interfaces::http::common::{domain_error, ok, ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::modules::entries::EntryDto;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationState {
    pub parking: Arc<ParkingService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    responses(
        (status = 200, description = "All reservations, latest scheduled first", body = ApiResponse<Vec<ReservationDto>>)
    )
)]
pub async fn list_reservations(State(state): State<ReservationState>) -> ApiResult<Vec<ReservationDto>> {
    let reservations = state.parking.list_reservations().await.map_err(domain_error)?;
    ok(reservations.into_iter().map(Into::into).collect())
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Slot reserved", body = ApiResponse<ReservationDto>),
        (status = 409, description = "Lot full, slot unavailable, or lot not configured"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationState>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let reservation = state
        .parking
        .create_reservation(CreateReservationCommand {
            slot_number: request.slot_number,
            reservation_datetime: request.reservation_datetime,
            customer_name: request.customer_name,
            vehicle_number: request.vehicle_number,
            vehicle_type: request.vehicle_type.map(Into::into),
        })
        .await
        .map_err(domain_error)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(reservation.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found"),
        (status = 422, description = "Reservation is no longer active")
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationState>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationDto> {
    let reservation = state.parking.cancel_reservation(id).await.map_err(domain_error)?;
    ok(reservation.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/check-in",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Vehicle parked on the reserved slot", body = ApiResponse<EntryDto>),
        (status = 404, description = "Reservation not found"),
        (status = 422, description = "Reservation is no longer active or vehicle details are missing")
    )
)]
pub async fn check_in_reservation(
    State(state): State<ReservationState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<CheckInRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EntryDto>>), ApiError> {
    let entry = state
        .parking
        .check_in_reservation(
            id,
            CheckInCommand {
                vehicle_number: request.vehicle_number,
                owner_name: request.owner_name,
                vehicle_type: request.vehicle_type.map(Into::into),
            },
        )
        .await
        .map_err(domain_error)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(entry.into()))))
}
