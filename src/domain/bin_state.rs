//! Current fill state of the two bins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::waste::WasteType;

/// Default capacity of each bin, in volume units.
pub const DEFAULT_BIN_CAPACITY: f64 = 100.0;

/// Volume and weight currently held by one bin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BinContents {
    /// Accumulated volume.
    pub volume: f64,
    /// Accumulated weight in kg.
    pub weight: f64,
}

/// Authoritative snapshot of both bins.
///
/// Volumes and weights are non-negative. They grow under `add` and drop to
/// exactly zero when the bin is emptied. Capacities are reporting bounds
/// only and are never enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BinState {
    /// Volume in the general waste bin.
    pub normal_volume: f64,
    /// Weight in the general waste bin (kg).
    pub normal_weight: f64,
    /// Volume in the recycling bin.
    pub recycle_volume: f64,
    /// Weight in the recycling bin (kg).
    pub recycle_weight: f64,
    /// Nominal capacity of the general waste bin.
    pub normal_capacity: f64,
    /// Nominal capacity of the recycling bin.
    pub recycle_capacity: f64,
    /// Timestamp of the last mutation.
    pub last_updated: DateTime<Utc>,
}

impl BinState {
    /// Creates two empty bins with the given capacities.
    #[must_use]
    pub fn new(normal_capacity: f64, recycle_capacity: f64, now: DateTime<Utc>) -> Self {
        Self {
            normal_volume: 0.0,
            normal_weight: 0.0,
            recycle_volume: 0.0,
            recycle_weight: 0.0,
            normal_capacity,
            recycle_capacity,
            last_updated: now,
        }
    }

    /// Returns what the given bin currently holds.
    #[must_use]
    pub const fn contents(&self, waste_type: WasteType) -> BinContents {
        match waste_type {
            WasteType::Normal => BinContents {
                volume: self.normal_volume,
                weight: self.normal_weight,
            },
            WasteType::Recycle => BinContents {
                volume: self.recycle_volume,
                weight: self.recycle_weight,
            },
        }
    }

    /// Returns the nominal capacity of the given bin.
    #[must_use]
    pub const fn capacity(&self, waste_type: WasteType) -> f64 {
        match waste_type {
            WasteType::Normal => self.normal_capacity,
            WasteType::Recycle => self.recycle_capacity,
        }
    }

    /// Fill level as a percentage of capacity. May exceed 100.
    #[must_use]
    pub fn fill_percent(&self, waste_type: WasteType) -> f64 {
        let capacity = self.capacity(waste_type);
        if capacity <= 0.0 {
            return 0.0;
        }
        self.contents(waste_type).volume / capacity * 100.0
    }

    /// Whether every amount is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [
            self.normal_volume,
            self.normal_weight,
            self.recycle_volume,
            self.recycle_weight,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Deposits `volume` and `weight` into a bin.
    pub fn deposit(&mut self, waste_type: WasteType, volume: f64, weight: f64, now: DateTime<Utc>) {
        match waste_type {
            WasteType::Normal => {
                self.normal_volume += volume;
                self.normal_weight += weight;
            }
            WasteType::Recycle => {
                self.recycle_volume += volume;
                self.recycle_weight += weight;
            }
        }
        self.last_updated = now;
    }

    /// Resets a bin to zero and returns what it held beforehand.
    pub fn reset(&mut self, waste_type: WasteType, now: DateTime<Utc>) -> BinContents {
        let before = self.contents(waste_type);
        match waste_type {
            WasteType::Normal => {
                self.normal_volume = 0.0;
                self.normal_weight = 0.0;
            }
            WasteType::Recycle => {
                self.recycle_volume = 0.0;
                self.recycle_weight = 0.0;
            }
        }
        self.last_updated = now;
        before
    }
}
