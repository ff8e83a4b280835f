//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::modules::{
    checkout, entries, health, metrics, occupancy, reports, request_id, reservations, settings,
};
use crate::application::{ParkingService, ReportService, SettingsService};
use crate::domain::RepositoryProvider;

/// Unified state for every API route. Axum extracts the per-module handler
/// state via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub parking: Arc<ParkingService>,
    pub settings: Arc<SettingsService>,
    pub reports: Arc<ReportService>,
    /// Currency code shown next to amounts
    pub currency: String,
    pub started_at: Arc<Instant>,
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            repos: Arc::clone(&s.repos),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<AppState> for settings::SettingsState {
    fn from_ref(s: &AppState) -> Self {
        settings::SettingsState {
            service: Arc::clone(&s.settings),
            currency: s.currency.clone(),
        }
    }
}

impl FromRef<AppState> for occupancy::OccupancyState {
    fn from_ref(s: &AppState) -> Self {
        occupancy::OccupancyState {
            parking: Arc::clone(&s.parking),
            reports: Arc::clone(&s.reports),
        }
    }
}

impl FromRef<AppState> for entries::EntryState {
    fn from_ref(s: &AppState) -> Self {
        entries::EntryState {
            parking: Arc::clone(&s.parking),
            reports: Arc::clone(&s.reports),
        }
    }
}

impl FromRef<AppState> for checkout::CheckoutState {
    fn from_ref(s: &AppState) -> Self {
        checkout::CheckoutState {
            parking: Arc::clone(&s.parking),
            currency: s.currency.clone(),
        }
    }
}

impl FromRef<AppState> for reservations::ReservationState {
    fn from_ref(s: &AppState) -> Self {
        reservations::ReservationState {
            parking: Arc::clone(&s.parking),
        }
    }
}

impl FromRef<AppState> for reports::ReportState {
    fn from_ref(s: &AppState) -> Self {
        reports::ReportState {
            reports: Arc::clone(&s.reports),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Settings
        settings::get_settings,
        settings::update_settings,
        // Occupancy
        occupancy::get_availability,
        occupancy::get_dashboard,
        // Entries
        entries::create_entry,
        entries::search_entries,
        entries::get_entry,
        // Checkout
        checkout::quote_checkout,
        checkout::checkout,
        // Reservations
        reservations::list_reservations,
        reservations::create_reservation,
        reservations::cancel_reservation,
        reservations::check_in_reservation,
        // Reports
        reports::get_summary,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            settings::UpdateSettingsRequest,
            settings::SettingsDto,
            occupancy::AvailabilityDto,
            occupancy::DashboardDto,
            entries::VehicleTypeDto,
            entries::CreateEntryRequest,
            entries::EntryDto,
            checkout::CheckoutRequest,
            checkout::BillDto,
            reservations::CreateReservationRequest,
            reservations::CheckInRequest,
            reservations::ReservationDto,
            reports::SummaryDto,
            reports::HourlyCountDto,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Settings", description = "Lot capacity and hourly rate"),
        (name = "Occupancy", description = "Slot availability and the front-desk dashboard"),
        (name = "Entries", description = "Vehicle registration and the entry log"),
        (name = "Checkout", description = "Billing and ending a stay"),
        (name = "Reservations", description = "Holding slots for expected vehicles"),
        (name = "Reports", description = "Daily, weekly and monthly activity"),
    ),
    info(
        title = "Parking Service API",
        version = "1.0.0",
        description = "REST API for parking lot occupancy, reservations and billing",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/availability", get(occupancy::get_availability))
        .route("/dashboard", get(occupancy::get_dashboard))
        .route(
            "/entries",
            get(entries::search_entries).post(entries::create_entry),
        )
        .route("/entries/{id}", get(entries::get_entry))
        .route("/checkout", post(checkout::checkout))
        .route("/checkout/{vehicle_number}", get(checkout::quote_checkout))
        .route(
            "/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/reservations/{id}/cancel",
            post(reservations::cancel_reservation),
        )
        .route(
            "/reservations/{id}/check-in",
            post(reservations::check_in_reservation),
        )
        .route("/reports/summary", get(reports::get_summary));

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: prometheus_handle,
        });

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .with_state(state)
        .merge(metrics_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// ── Tests ──────────────────────────────────────────────────────
