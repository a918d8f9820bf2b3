//! History and reporting query DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{EventType, TrashLogEntry, WasteType};
use crate::error::LedgerError;
use crate::persistence::{HistoryQuery, SortOrder};
use crate::reporting::{BucketTotals, TimeBucket};

/// Hard cap on entries returned by one history request.
pub const MAX_HISTORY_LIMIT: usize = 1_000;

/// Query parameters for `GET /history`.
///
/// Enum values are taken as strings so that bad values produce the
/// service's own validation errors.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Inclusive lower bound (RFC 3339).
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound (RFC 3339).
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// `"normal"` or `"recycle"`.
    #[serde(default)]
    pub waste_type: Option<String>,
    /// `"add"` or `"empty"`.
    #[serde(default)]
    pub event_type: Option<String>,
    /// `"asc"` (default) or `"desc"`.
    #[serde(default)]
    pub order: Option<String>,
    /// Maximum entries to return (capped at 1000).
    #[serde(default)]
    pub limit: Option<usize>,
}

impl HistoryParams {
    /// Validates the parameters into a store query.
    ///
    /// # Errors
    ///
    /// Returns a validation [`LedgerError`] for unknown enum values or an
    /// inverted range.
    pub fn into_query(self) -> Result<HistoryQuery, LedgerError> {
        let order = match self.order.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            Some(other) => {
                return Err(LedgerError::InvalidInput(format!(
                    "invalid order {other:?}: must be \"asc\" or \"desc\""
                )));
            }
        };
        let query = HistoryQuery {
            start: self.start,
            end: self.end,
            waste_type: self
                .waste_type
                .as_deref()
                .map(str::parse::<WasteType>)
                .transpose()?,
            event_type: self
                .event_type
                .as_deref()
                .map(str::parse::<EventType>)
                .transpose()?,
            order,
            limit: Some(self.limit.unwrap_or(MAX_HISTORY_LIMIT).min(MAX_HISTORY_LIMIT)),
        };
        query.validate()?;
        Ok(query)
    }
}

/// Query parameters for `GET /history/grouped`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GroupedParams {
    /// `"hour"`, `"day"` (default) or `"month"`.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Inclusive lower bound (RFC 3339).
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound (RFC 3339).
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// `"normal"` or `"recycle"`.
    #[serde(default)]
    pub waste_type: Option<String>,
}

impl GroupedParams {
    /// Validates the parameters into a bucket and store query.
    ///
    /// # Errors
    ///
    /// Returns a validation [`LedgerError`] for unknown values or an
    /// inverted range.
    pub fn into_query(self) -> Result<(TimeBucket, HistoryQuery), LedgerError> {
        let bucket = self
            .bucket
            .as_deref()
            .map(str::parse::<TimeBucket>)
            .transpose()?
            .unwrap_or_default();
        let query = HistoryQuery {
            start: self.start,
            end: self.end,
            waste_type: self
                .waste_type
                .as_deref()
                .map(str::parse::<WasteType>)
                .transpose()?,
            ..HistoryQuery::all()
        };
        query.validate()?;
        Ok((bucket, query))
    }
}

/// Response body for `GET /history`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    /// Matching entries in the requested order.
    pub data: Vec<TrashLogEntry>,
    /// Number of entries returned.
    pub count: usize,
    /// More entries matched than `limit` allowed.
    pub truncated: bool,
}

/// Response body for `GET /history/grouped`.
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupedHistoryResponse {
    /// Granularity used.
    pub bucket: TimeBucket,
    /// Groups ascending by bucket start, then waste type.
    pub data: Vec<BucketTotals>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn defaults_are_ascending_and_capped() {
        let Ok(query) = HistoryParams::default().into_query() else {
            panic!("defaults are valid");
        };
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.limit, Some(MAX_HISTORY_LIMIT));
    }

    #[test]
    fn limit_is_clamped() {
        let params = HistoryParams {
            limit: Some(50_000),
            order: Some("DESC".to_string()),
            ..HistoryParams::default()
        };
        let Ok(query) = params.into_query() else {
            panic!("valid params");
        };
        assert_eq!(query.limit, Some(MAX_HISTORY_LIMIT));
        assert_eq!(query.order, SortOrder::Desc);
    }

    #[test]
    fn bad_waste_type_is_rejected() {
        let params = HistoryParams {
            waste_type: Some("paper".to_string()),
            ..HistoryParams::default()
        };
        assert!(matches!(
            params.into_query(),
            Err(LedgerError::InvalidWasteType(_))
        ));
    }

    #[test]
    fn bad_order_is_rejected() {
        let params = HistoryParams {
            order: Some("sideways".to_string()),
            ..HistoryParams::default()
        };
        assert!(matches!(params.into_query(), Err(LedgerError::InvalidInput(_))));
    }

    #[test]
    fn grouped_defaults_to_daily() {
        let Ok((bucket, _)) = GroupedParams::default().into_query() else {
            panic!("defaults are valid");
        };
        assert_eq!(bucket, TimeBucket::Day);
    }

    #[test]
    fn grouped_rejects_inverted_range() {
        let now = Utc::now();
        let params = GroupedParams {
            start: Some(now),
            end: Some(now - Duration::hours(1)),
            ..GroupedParams::default()
        };
        assert!(matches!(
            params.into_query(),
            Err(LedgerError::InvalidDateRange { .. })
        ));
    }
}
