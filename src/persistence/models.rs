//! Store-facing models: commits and history queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EventType, LedgerState, NewLogEntry, TrashLogEntry, WasteType};
use crate::error::LedgerError;

/// Everything one mutation writes, applied atomically by the store.
#[derive(Debug, Clone)]
pub struct LedgerCommit {
    /// Complete state after the mutation.
    pub state: LedgerState,
    /// Log entries to append, in order.
    pub entries: Vec<NewLogEntry>,
    /// Whether the summary row needs rewriting.
    pub summary_changed: bool,
}

/// Sort direction on `(timestamp, id)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Asc,
    /// Newest first.
    Desc,
}

/// Filters for reading the trash log.
///
/// `start` and `end` are both inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryQuery {
    /// Earliest timestamp to include.
    pub start: Option<DateTime<Utc>>,
    /// Latest timestamp to include.
    pub end: Option<DateTime<Utc>>,
    /// Restrict to one bin.
    pub waste_type: Option<WasteType>,
    /// Restrict to adds or empties.
    pub event_type: Option<EventType>,
    /// Result ordering.
    pub order: SortOrder,
    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}

impl HistoryQuery {
    /// Every entry, oldest first.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// The `n` most recent entries, newest first.
    #[must_use]
    pub fn recent(n: usize) -> Self {
        Self {
            order: SortOrder::Desc,
            limit: Some(n),
            ..Self::default()
        }
    }

    /// Entries within `[start, end]`, oldest first.
    #[must_use]
    pub fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    /// Checks that the range is not inverted.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidDateRange`] when `start > end`.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if let (Some(start), Some(end)) = (self.start, self.end)
            && start > end
        {
            return Err(LedgerError::InvalidDateRange { start, end });
        }
        Ok(())
    }

    /// Returns `true` if `entry` passes every filter (ignores order/limit).
    #[must_use]
    pub fn matches(&self, entry: &TrashLogEntry) -> bool {
        self.start.is_none_or(|start| entry.timestamp >= start)
            && self.end.is_none_or(|end| entry.timestamp <= end)
            && self.waste_type.is_none_or(|w| entry.waste_type == w)
            && self.event_type.is_none_or(|e| entry.event_type == e)
    }
}
