//! OpenAPI document for every REST endpoint.

use utoipa::OpenApi;

use crate::api::dto::{
    AddTrashRequest, AddTrashResponse, CurrentStatusDto, GroupedHistoryResponse, HistoryResponse,
    ResetRequest, ResetResponse, StatusResponse,
};
use crate::api::handlers::{bins, reports, system};
use crate::domain::{
    BinContents, BinState, EmissionsFactors, EmissionsSummary, EventType, TrashLogEntry, WasteType,
};
use crate::error::{ErrorBody, ErrorResponse};
use crate::reporting::{
    AuditReport, BucketTotals, DailyCollectedWeight, DailyEmissions, HourlyActivity, ReplayedBins,
    TimeBucket, TypeStatistics,
};
use crate::service::Dashboard;

/// Generated API description served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "waste-ledger",
        description = "Smart waste bin ledger with Scope 3 CO2e emissions accounting."
    ),
    paths(
        bins::add_trash,
        bins::reset_bins,
        bins::get_status,
        bins::get_summary,
        reports::get_history,
        reports::get_grouped_history,
        reports::get_stats,
        reports::get_dashboard,
        reports::get_audit,
        system::health_handler,
        system::emissions_factors_handler,
    ),
    components(schemas(
        AddTrashRequest,
        AddTrashResponse,
        CurrentStatusDto,
        ResetRequest,
        ResetResponse,
        StatusResponse,
        HistoryResponse,
        GroupedHistoryResponse,
        BinContents,
        BinState,
        EmissionsFactors,
        EmissionsSummary,
        TrashLogEntry,
        WasteType,
        EventType,
        TimeBucket,
        BucketTotals,
        TypeStatistics,
        DailyEmissions,
        HourlyActivity,
        DailyCollectedWeight,
        ReplayedBins,
        AuditReport,
        Dashboard,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
        system::EmissionsConfigResponse,
    )),
    tags(
        (name = "Bins", description = "Deposit waste, empty bins, read current state"),
        (name = "Reports", description = "History, aggregates, dashboard and audit"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;
