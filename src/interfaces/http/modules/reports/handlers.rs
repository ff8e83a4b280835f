//! Report REST API handlers

use std::sync::Arc;

use axum::extract::{Query, State};

use super::dto::{SummaryDto, SummaryQuery};
use crate::application::{ReportPeriod, ReportService};
use crate::interfaces::http::common::{domain_error, ok, ApiResponse, ApiResult};

#[derive(Clone)]
pub struct ReportState {
    pub reports: Arc<ReportService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    tag = "Reports",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Activity in the current period", body = ApiResponse<SummaryDto>),
        (status = 422, description = "Unknown period")
    )
)]
pub async fn get_summary(
    State(state): State<ReportState>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<SummaryDto> {
    let period = match query.period.as_deref() {
        Some(raw) => raw.parse::<ReportPeriod>().map_err(domain_error)?,
        None => ReportPeriod::Daily,
    };
    let summary = state.reports.summary(period).await.map_err(domain_error)?;
    ok(summary.into())
}
