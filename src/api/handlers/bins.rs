//! Bin handlers: add waste, reset bins, status, emissions summary.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AddTrashRequest, AddTrashResponse, CurrentStatusDto, ResetRequest, ResetResponse,
    StatusResponse, capitalize,
};
use crate::app_state::AppState;
use crate::domain::{EmissionsSummary, EmptyTarget, WasteType};
use crate::error::{ErrorResponse, LedgerError};

/// `POST /trash`: Deposit waste into a bin.
///
/// # Errors
///
/// Returns [`LedgerError`] on a malformed body, invalid waste type,
/// non-positive amounts or a failed commit.
#[utoipa::path(
    post,
    path = "/api/v1/trash",
    tag = "Bins",
    summary = "Add waste",
    description = "Adds a volume and weight of waste to the general or recycling bin and logs the event.",
    request_body = AddTrashRequest,
    responses(
        (status = 201, description = "Waste added", body = AddTrashResponse),
        (status = 400, description = "Invalid waste type or amounts", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn add_trash(
    State(state): State<AppState>,
    body: Result<Json<AddTrashRequest>, JsonRejection>,
) -> Result<impl IntoResponse, LedgerError> {
    let Json(req) = body?;
    let waste_type: WasteType = req.waste_type.parse()?;
    let bin = state
        .ledger_service
        .add_waste(waste_type, req.volume, req.weight)
        .await?;

    let response = AddTrashResponse {
        success: true,
        message: format!("{} waste added successfully", capitalize(waste_type.as_str())),
        current_status: CurrentStatusDto::from(&bin),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /reset`: Empty one or both bins.
///
/// The body is optional; without one both bins are emptied.
///
/// # Errors
///
/// Returns [`LedgerError`] on an invalid target or a failed commit.
#[utoipa::path(
    post,
    path = "/api/v1/reset",
    tag = "Bins",
    summary = "Empty bins",
    description = "Empties the general bin, the recycling bin, or both, logging one empty event per bin with its CO2 impact. Emptying an empty bin succeeds.",
    request_body(content = ResetRequest, description = "Bin to empty (defaults to both)"),
    responses(
        (status = 200, description = "Bins emptied", body = ResetResponse),
        (status = 400, description = "Invalid target", body = ErrorResponse),
        (status = 500, description = "Storage failure; nothing was emptied", body = ErrorResponse),
    )
)]
pub async fn reset_bins(
    State(state): State<AppState>,
    body: Result<Option<Json<ResetRequest>>, JsonRejection>,
) -> Result<impl IntoResponse, LedgerError> {
    let req = body?.map(|Json(req)| req).unwrap_or_default();
    let target = req
        .waste_type
        .as_deref()
        .map(str::parse::<EmptyTarget>)
        .transpose()?
        .unwrap_or_default();

    let emptied = state.ledger_service.empty_bins(target).await?;

    let response = ResetResponse {
        success: true,
        message: format!("{} bin reset successfully", capitalize(target.as_str())),
        emptied,
    };
    Ok((StatusCode::OK, Json(response)))
}

/// `GET /status`: Current bin contents.
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "Bins",
    summary = "Bin status",
    description = "Returns the current volume, weight, capacity and fill level of both bins.",
    responses(
        (status = 200, description = "Current bin status", body = StatusResponse),
    )
)]
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let bin = state.ledger_service.status().await;
    (StatusCode::OK, Json(StatusResponse::from(bin)))
}

/// `GET /summary`: Running emissions totals.
#[utoipa::path(
    get,
    path = "/api/v1/summary",
    tag = "Bins",
    summary = "Emissions summary",
    description = "Returns cumulative landfill, recycling, avoided and net CO2 emissions plus total diverted weight.",
    responses(
        (status = 200, description = "Emissions totals", body = EmissionsSummary),
    )
)]
pub async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.ledger_service.summary().await))
}

/// Bin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trash", post(add_trash))
        .route("/reset", post(reset_bins))
        .route("/status", get(get_status))
        .route("/summary", get(get_summary))
}
