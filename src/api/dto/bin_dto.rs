//! Bin operation DTOs: add, reset, status.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BinState, TrashLogEntry, WasteType};

/// Request body for `POST /trash`.
///
/// Missing amounts default to zero and are then rejected as non-positive.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddTrashRequest {
    /// `"normal"` or `"recycle"` (case-insensitive).
    #[serde(default)]
    pub waste_type: String,
    /// Volume deposited. Must be positive.
    #[serde(default)]
    pub volume: f64,
    /// Weight deposited in kg. Must be positive.
    #[serde(default)]
    pub weight: f64,
}

/// Bin contents echoed after an add.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentStatusDto {
    /// Volume in the general waste bin.
    pub normal_volume: f64,
    /// Weight in the general waste bin.
    pub normal_weight: f64,
    /// Volume in the recycling bin.
    pub recycle_volume: f64,
    /// Weight in the recycling bin.
    pub recycle_weight: f64,
}

impl From<&BinState> for CurrentStatusDto {
    fn from(bin: &BinState) -> Self {
        Self {
            normal_volume: bin.normal_volume,
            normal_weight: bin.normal_weight,
            recycle_volume: bin.recycle_volume,
            recycle_weight: bin.recycle_weight,
        }
    }
}

/// Response body for `POST /trash` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct AddTrashResponse {
    /// Always `true`; failures use the error body.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
    /// Bin contents after the add.
    pub current_status: CurrentStatusDto,
}

/// Request body for `POST /reset`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ResetRequest {
    /// `"normal"`, `"recycle"` or `"both"`. Defaults to `"both"`.
    #[serde(default)]
    pub waste_type: Option<String>,
}

/// Response body for `POST /reset`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResetResponse {
    /// Always `true`; failures use the error body.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
    /// One empty entry per bin emptied.
    pub emptied: Vec<TrashLogEntry>,
}

/// Response body for `GET /status`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Current bin state.
    #[serde(flatten)]
    pub bin: BinState,
    /// General waste bin fill level in percent of capacity.
    pub normal_fill_percent: f64,
    /// Recycling bin fill level in percent of capacity.
    pub recycle_fill_percent: f64,
}

impl From<BinState> for StatusResponse {
    fn from(bin: BinState) -> Self {
        Self {
            normal_fill_percent: bin.fill_percent(WasteType::Normal),
            recycle_fill_percent: bin.fill_percent(WasteType::Recycle),
            bin,
        }
    }
}

/// Capitalizes the first letter of a wire name for messages.
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
