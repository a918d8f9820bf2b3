//! Ledger error types with HTTP status code mapping.
//!
//! [`LedgerError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid input: volume and weight must be positive numbers",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 3000–3999 | Server     | 500 Internal Server Error |
///
/// Validation errors are raised before any state is touched. A
/// [`LedgerError::StorageFailure`] means the operation was not applied.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Request validation failed (e.g. non-positive volume or weight).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Waste type outside the closed `normal` / `recycle` set.
    #[error("invalid waste_type {0:?}: must be \"normal\" or \"recycle\"")]
    InvalidWasteType(String),

    /// Empty target outside `normal` / `recycle` / `both`.
    #[error("invalid empty target {0:?}: must be \"normal\", \"recycle\" or \"both\"")]
    InvalidEmptyTarget(String),

    /// History range whose start lies after its end.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Requested range start.
        start: chrono::DateTime<chrono::Utc>,
        /// Requested range end.
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Underlying store unavailable or write failed.
    #[error("storage failure: {0}")]
    StorageFailure(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidInput(_) => 1001,
            Self::InvalidWasteType(_) => 1002,
            Self::InvalidEmptyTarget(_) => 1003,
            Self::InvalidDateRange { .. } => 1004,
            Self::Internal(_) => 3000,
            Self::StorageFailure(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_)
            | Self::InvalidWasteType(_)
            | Self::InvalidEmptyTarget(_)
            | Self::InvalidDateRange { .. } => StatusCode::BAD_REQUEST,
            Self::StorageFailure(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for errors in the validation range, which are always
    /// raised before any mutation.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::InvalidWasteType(_)
                | Self::InvalidEmptyTarget(_)
                | Self::InvalidDateRange { .. }
        )
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        Self::StorageFailure(err.to_string())
    }
}

impl From<JsonRejection> for LedgerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
