//! System endpoints: health check and emissions configuration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::EmissionsFactors;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    store: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health, version, current timestamp and store reachability.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Store is unreachable", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = state.ledger_service.store().health_check().await;
    let (code, status, store) = if store_ok {
        (StatusCode::OK, "healthy", "ok")
    } else {
        tracing::warn!("health check: store unreachable");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };
    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: store.to_string(),
        }),
    )
}

/// Active emissions configuration.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmissionsConfigResponse {
    factors: EmissionsFactors,
    normal_capacity: f64,
    recycle_capacity: f64,
}

/// `GET /config/emissions-factors`: Active CO2 factors and bin capacities.
#[utoipa::path(
    get,
    path = "/config/emissions-factors",
    tag = "System",
    summary = "Emissions factors",
    description = "Returns the CO2 factors (kg CO2 per kg waste) and bin capacities in effect.",
    responses(
        (status = 200, description = "Active configuration", body = EmissionsConfigResponse),
    )
)]
pub async fn emissions_factors_handler(State(state): State<AppState>) -> impl IntoResponse {
    let bin = state.ledger_service.status().await;
    (
        StatusCode::OK,
        Json(EmissionsConfigResponse {
            factors: *state.ledger_service.factors(),
            normal_capacity: bin.normal_capacity,
            recycle_capacity: bin.recycle_capacity,
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/emissions-factors", get(emissions_factors_handler))
}
