//! Append-only trash log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::waste::{EventType, WasteType};

/// One immutable add or empty event as stored in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrashLogEntry {
    /// Store-assigned, monotonically increasing row ID.
    pub id: i64,
    /// Correlates entries written by the same operation.
    pub batch_id: Uuid,
    /// Bin the event applies to.
    pub waste_type: WasteType,
    /// Volume added, or volume held before emptying.
    pub volume: f64,
    /// Weight added, or weight held before emptying (kg).
    pub weight: f64,
    /// Add or empty.
    pub event_type: EventType,
    /// kg CO2e attributed to the event. Always 0 for adds.
    pub co2_emissions: f64,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
}

/// A log entry that has not been assigned an ID yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    /// Operation correlation ID.
    pub batch_id: Uuid,
    /// Bin the event applies to.
    pub waste_type: WasteType,
    /// Volume involved.
    pub volume: f64,
    /// Weight involved (kg).
    pub weight: f64,
    /// Add or empty.
    pub event_type: EventType,
    /// kg CO2e attributed to the event.
    pub co2_emissions: f64,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
}

impl NewLogEntry {
    /// Attaches the store-assigned ID.
    #[must_use]
    pub fn with_id(self, id: i64) -> TrashLogEntry {
        TrashLogEntry {
            id,
            batch_id: self.batch_id,
            waste_type: self.waste_type,
            volume: self.volume,
            weight: self.weight,
            event_type: self.event_type,
            co2_emissions: self.co2_emissions,
            timestamp: self.timestamp,
        }
    }
}
