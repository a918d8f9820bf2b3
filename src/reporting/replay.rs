//! Log replay: rebuilding bin contents from the trash log.
//!
//! Adds increment a bin and empties reset it, so replaying the full log in
//! timestamp order must land on the live [`BinState`]. A mismatch means the
//! log and the state record have drifted apart.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BinContents, BinState, EventType, TrashLogEntry, WasteType};

/// Absolute tolerance when comparing replayed and live amounts.
pub const REPLAY_TOLERANCE: f64 = 1e-6;

/// Bin contents reconstructed from the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct ReplayedBins {
    /// General waste bin.
    pub normal: BinContents,
    /// Recycling bin.
    pub recycle: BinContents,
}

impl ReplayedBins {
    fn slot(&mut self, waste_type: WasteType) -> &mut BinContents {
        match waste_type {
            WasteType::Normal => &mut self.normal,
            WasteType::Recycle => &mut self.recycle,
        }
    }
}

/// Outcome of comparing the replayed log with the live state.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AuditReport {
    /// Whether replay and live state agree within [`REPLAY_TOLERANCE`].
    pub consistent: bool,
    /// Contents rebuilt from the log.
    pub replayed: ReplayedBins,
    /// Contents of the live state.
    pub current: ReplayedBins,
    /// Number of log entries replayed.
    pub entries_replayed: usize,
}

/// Replays entries, which must be in ascending `(timestamp, id)` order.
#[must_use]
pub fn replay(entries: &[TrashLogEntry]) -> ReplayedBins {
    let mut bins = ReplayedBins::default();
    for entry in entries {
        let slot = bins.slot(entry.waste_type);
        match entry.event_type {
            EventType::Add => {
                slot.volume += entry.volume;
                slot.weight += entry.weight;
            }
            EventType::Empty => *slot = BinContents::default(),
        }
    }
    bins
}

/// Replays `entries` and compares the result with `state`.
#[must_use]
pub fn audit(entries: &[TrashLogEntry], state: &BinState) -> AuditReport {
    let replayed = replay(entries);
    let current = ReplayedBins {
        normal: state.contents(WasteType::Normal),
        recycle: state.contents(WasteType::Recycle),
    };
    let consistent =
        close(replayed.normal, current.normal) && close(replayed.recycle, current.recycle);
    AuditReport {
        consistent,
        replayed,
        current,
        entries_replayed: entries.len(),
    }
}

fn close(a: BinContents, b: BinContents) -> bool {
    (a.volume - b.volume).abs() <= REPLAY_TOLERANCE
        && (a.weight - b.weight).abs() <= REPLAY_TOLERANCE
}
