//! Reporting handlers: history, grouped history, statistics, dashboard,
//! ledger audit.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    GroupedHistoryResponse, GroupedParams, HistoryParams, HistoryResponse, MAX_HISTORY_LIMIT,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, LedgerError};
use crate::reporting::{AuditReport, TypeStatistics};
use crate::service::Dashboard;

/// `GET /history`: Filtered trash log.
///
/// # Errors
///
/// Returns [`LedgerError`] on invalid filters or a failed read.
#[utoipa::path(
    get,
    path = "/api/v1/history",
    tag = "Reports",
    summary = "Trash log history",
    description = "Returns log entries filtered by inclusive time range, waste type and event type. Ascending by default. `truncated` is set when more entries matched than `limit`.",
    params(HistoryParams),
    responses(
        (status = 200, description = "Matching log entries", body = HistoryResponse),
        (status = 400, description = "Invalid filter or inverted range", body = ErrorResponse),
    )
)]
pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, LedgerError> {
    let mut query = params.into_query()?;
    let limit = query.limit.unwrap_or(MAX_HISTORY_LIMIT);
    // one extra row tells whether the limit cut the result short
    query.limit = Some(limit.saturating_add(1));

    let mut data = state.ledger_service.history(&query).await?;
    let truncated = data.len() > limit;
    data.truncate(limit);
    let count = data.len();
    Ok((
        StatusCode::OK,
        Json(HistoryResponse {
            data,
            count,
            truncated,
        }),
    ))
}

/// `GET /history/grouped`: Log totals per time bucket.
///
/// # Errors
///
/// Returns [`LedgerError`] on invalid parameters or a failed read.
#[utoipa::path(
    get,
    path = "/api/v1/history/grouped",
    tag = "Reports",
    summary = "Grouped history",
    description = "Aggregates log entries per hour, day or month and waste type.",
    params(GroupedParams),
    responses(
        (status = 200, description = "Bucketed totals", body = GroupedHistoryResponse),
        (status = 400, description = "Invalid bucket or range", body = ErrorResponse),
    )
)]
pub async fn get_grouped_history(
    State(state): State<AppState>,
    Query(params): Query<GroupedParams>,
) -> Result<impl IntoResponse, LedgerError> {
    let (bucket, query) = params.into_query()?;
    let data = state.ledger_service.grouped_history(bucket, &query).await?;
    Ok((StatusCode::OK, Json(GroupedHistoryResponse { bucket, data })))
}

/// `GET /stats`: Lifetime statistics per bin.
///
/// # Errors
///
/// Returns [`LedgerError`] if the log cannot be read.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "Reports",
    summary = "Per-bin statistics",
    description = "Returns event counts, averages and totals for each waste type.",
    responses(
        (status = 200, description = "Statistics for both bins", body = Vec<TypeStatistics>),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, LedgerError> {
    let stats = state.ledger_service.statistics().await?;
    Ok((StatusCode::OK, Json(stats)))
}

/// `GET /dashboard`: Everything the dashboard renders.
///
/// # Errors
///
/// Returns [`LedgerError`] if the log cannot be read.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Reports",
    summary = "Dashboard",
    description = "Returns bin status, emissions totals, recent events, per-bin statistics and trend series.",
    responses(
        (status = 200, description = "Dashboard data", body = Dashboard),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, LedgerError> {
    let dashboard = state.ledger_service.dashboard().await?;
    Ok((StatusCode::OK, Json(dashboard)))
}

/// `GET /audit`: Replay the log against the live bins.
///
/// # Errors
///
/// Returns [`LedgerError`] if the log cannot be read.
#[utoipa::path(
    get,
    path = "/api/v1/audit",
    tag = "Reports",
    summary = "Ledger audit",
    description = "Replays every add and empty event and reports whether the result matches current bin contents.",
    responses(
        (status = 200, description = "Audit result", body = AuditReport),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn get_audit(State(state): State<AppState>) -> Result<impl IntoResponse, LedgerError> {
    let report = state.ledger_service.audit().await?;
    Ok((StatusCode::OK, Json(report)))
}

/// Reporting routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/history", get(get_history))
        .route("/history/grouped", get(get_grouped_history))
        .route("/stats", get(get_stats))
        .route("/dashboard", get(get_dashboard))
        .route("/audit", get(get_audit))
}
