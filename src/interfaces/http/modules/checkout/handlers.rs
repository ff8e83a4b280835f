//! Checkout REST API handlers

use std::sync::Arc;

use axum::extract::{Path, State};

use super::dto::{BillDto, CheckoutRequest};
use crate::application::ParkingService;
use crate::interfaces::http::common::{domain_error, ok, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct CheckoutState {
    pub parking: Arc<ParkingService>,
    pub currency: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/checkout/{vehicle_number}",
    tag = "Checkout",
    params(("vehicle_number" = String, Path, description = "Registration number (case-insensitive)")),
    responses(
        (status = 200, description = "Bill as of now; the stay is not ended", body = ApiResponse<BillDto>),
        (status = 404, description = "Vehicle is not parked"),
        (status = 409, description = "Vehicle has already exited")
    )
)]
pub async fn quote_checkout(
    State(state): State<CheckoutState>,
    Path(vehicle_number): Path<String>,
) -> ApiResult<BillDto> {
    let outcome = state
        .parking
        .quote_checkout(&vehicle_number)
        .await
        .map_err(domain_error)?;
    ok(BillDto::new(outcome, &state.currency))
}

#[utoipa::path(
    post,
    path = "/api/v1/checkout",
    tag = "Checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Stay ended and billed", body = ApiResponse<BillDto>),
        (status = 404, description = "Vehicle is not parked"),
        (status = 409, description = "Vehicle has already exited")
    )
)]
pub async fn checkout(
    State(state): State<CheckoutState>,
    ValidatedJson(request): ValidatedJson<CheckoutRequest>,
) -> ApiResult<BillDto> {
    let outcome = state
        .parking
        .checkout(&request.vehicle_number)
        .await
        .map_err(domain_error)?;
    ok(BillDto::new(outcome, &state.currency))
}
