//! Time-bucketed aggregation of log entries.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EventType, TrashLogEntry, WasteType};
use crate::error::LedgerError;

/// Granularity of a grouped history query. Buckets are aligned in UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    /// One bucket per clock hour.
    Hour,
    /// One bucket per calendar day.
    #[default]
    Day,
    /// One bucket per calendar month.
    Month,
}

impl TimeBucket {
    /// Start of the bucket containing `ts`.
    #[must_use]
    pub fn truncate(self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let date = ts.date_naive();
        match self {
            Self::Hour => {
                let hour = NaiveTime::from_hms_opt(ts.hour(), 0, 0).unwrap_or(NaiveTime::MIN);
                date.and_time(hour).and_utc()
            }
            Self::Day => date.and_time(NaiveTime::MIN).and_utc(),
            Self::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .unwrap_or(date)
                .and_time(NaiveTime::MIN)
                .and_utc(),
        }
    }

    /// Human-readable label for a bucket start.
    #[must_use]
    pub fn label(self, start: DateTime<Utc>) -> String {
        let format = match self {
            Self::Hour => "%Y-%m-%d %H:00",
            Self::Day => "%Y-%m-%d",
            Self::Month => "%Y-%m",
        };
        start.format(format).to_string()
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
        })
    }
}

impl FromStr for TimeBucket {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" | "hourly" => Ok(Self::Hour),
            "day" | "daily" => Ok(Self::Day),
            "month" | "monthly" => Ok(Self::Month),
            _ => Err(LedgerError::InvalidInput(format!(
                "invalid bucket {s:?}: must be \"hour\", \"day\" or \"month\""
            ))),
        }
    }
}

/// Totals for one (bucket, waste type) group.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BucketTotals {
    /// Start of the bucket (UTC).
    pub bucket_start: DateTime<Utc>,
    /// Formatted bucket label.
    pub label: String,
    /// Bin the group covers.
    pub waste_type: WasteType,
    /// Number of events in the group.
    pub event_count: u64,
    /// Number of add events.
    pub add_count: u64,
    /// Number of empty events.
    pub empty_count: u64,
    /// Summed volume over all events.
    pub total_volume: f64,
    /// Summed weight over all events.
    pub total_weight: f64,
    /// Mean volume per event.
    pub avg_volume: f64,
    /// Mean weight per event.
    pub avg_weight: f64,
    /// Weight deposited by add events.
    pub weight_added: f64,
    /// Weight removed by empty events.
    pub weight_emptied: f64,
    /// Summed signed CO2e.
    pub total_co2: f64,
}

#[derive(Debug, Default)]
struct Accumulator {
    add_count: u64,
    empty_count: u64,
    total_volume: f64,
    total_weight: f64,
    weight_added: f64,
    weight_emptied: f64,
    total_co2: f64,
}

impl Accumulator {
    fn push(&mut self, entry: &TrashLogEntry) {
        match entry.event_type {
            EventType::Add => {
                self.add_count += 1;
                self.weight_added += entry.weight;
            }
            EventType::Empty => {
                self.empty_count += 1;
                self.weight_emptied += entry.weight;
            }
        }
        self.total_volume += entry.volume;
        self.total_weight += entry.weight;
        self.total_co2 += entry.co2_emissions;
    }
}

/// Groups entries by bucket and waste type.
///
/// Output is ascending by bucket start, then waste type (normal first).
/// Buckets without events are omitted.
#[must_use]
pub fn group_entries(entries: &[TrashLogEntry], bucket: TimeBucket) -> Vec<BucketTotals> {
    let mut groups: BTreeMap<(DateTime<Utc>, WasteType), Accumulator> = BTreeMap::new();
    for entry in entries {
        groups
            .entry((bucket.truncate(entry.timestamp), entry.waste_type))
            .or_default()
            .push(entry);
    }

    groups
        .into_iter()
        .map(|((start, waste_type), acc)| {
            let event_count = acc.add_count + acc.empty_count;
            BucketTotals {
                bucket_start: start,
                label: bucket.label(start),
                waste_type,
                event_count,
                add_count: acc.add_count,
                empty_count: acc.empty_count,
                total_volume: acc.total_volume,
                total_weight: acc.total_weight,
                avg_volume: mean(acc.total_volume, event_count),
                avg_weight: mean(acc.total_weight, event_count),
                weight_added: acc.weight_added,
                weight_emptied: acc.weight_emptied,
                total_co2: acc.total_co2,
            }
        })
        .collect()
}

/// Mean of `total` over `count` items; zero when empty.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(total: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}
