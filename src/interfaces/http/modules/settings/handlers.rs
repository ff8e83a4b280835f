//! Settings REST API handlers

use std::sync::Arc;

use axum::extract::State;

use super::dto::{SettingsDto, UpdateSettingsRequest};
use crate::application::SettingsService;
use crate::interfaces::http::common::{domain_error, ok, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct SettingsState {
    pub service: Arc<SettingsService>,
    pub currency: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/settings",
    tag = "Settings",
    responses(
        (status = 200, description = "Current configuration", body = ApiResponse<SettingsDto>),
        (status = 409, description = "Lot not configured yet")
    )
)]
pub async fn get_settings(State(state): State<SettingsState>) -> ApiResult<SettingsDto> {
    let settings = state.service.get().await.map_err(domain_error)?;
    ok(SettingsDto::new(settings, &state.currency))
}

#[utoipa::path(
    put,
    path = "/api/v1/settings",
    tag = "Settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Configuration saved", body = ApiResponse<SettingsDto>),
        (status = 422, description = "Invalid slot count or rate")
    )
)]
pub async fn update_settings(
    State(state): State<SettingsState>,
    ValidatedJson(request): ValidatedJson<UpdateSettingsRequest>,
) -> ApiResult<SettingsDto> {
    let settings = state
        .service
        .upsert(request.total_slots, request.rate_per_hour)
        .await
        .map_err(domain_error)?;
    ok(SettingsDto::new(settings, &state.currency))
}
