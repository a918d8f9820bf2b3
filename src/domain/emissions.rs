//! Scope 3 emissions factors and the per-event emissions calculation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::waste::{EventType, WasteType};

/// Default kg CO2e per kg of waste sent to landfill.
pub const DEFAULT_LANDFILL_FACTOR: f64 = 0.5;
/// Default kg CO2e per kg of waste processed as recycling.
pub const DEFAULT_RECYCLING_FACTOR: f64 = 0.1;
/// Default kg CO2e avoided per kg recycled (displaced virgin production).
pub const DEFAULT_AVOIDED_FACTOR: f64 = 2.0;

/// Per-kilogram emissions factors, loaded once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmissionsFactors {
    /// kg CO2e per kg of waste to landfill.
    pub landfill: f64,
    /// kg CO2e per kg of recycling processed.
    pub recycling: f64,
    /// kg CO2e avoided per kg diverted to recycling.
    pub avoided: f64,
}

impl EmissionsFactors {
    /// Creates a new set of factors.
    #[must_use]
    pub const fn new(landfill: f64, recycling: f64, avoided: f64) -> Self {
        Self {
            landfill,
            recycling,
            avoided,
        }
    }

    /// CO2e contribution of a single event.
    ///
    /// Emissions are only recognized when a bin is emptied: an `Add` always
    /// yields exactly `0.0`. Emptying a normal bin yields
    /// `weight * landfill`; emptying the recycling bin yields
    /// `weight * recycling - weight * avoided`, which is negative whenever
    /// the avoided factor dominates.
    ///
    /// `weight` must be non-negative.
    #[must_use]
    pub fn compute_emissions(
        &self,
        weight: f64,
        waste_type: WasteType,
        event_type: EventType,
    ) -> f64 {
        debug_assert!(weight >= 0.0, "weight must be non-negative, got {weight}");
        match (event_type, waste_type) {
            (EventType::Add, _) => 0.0,
            (EventType::Empty, WasteType::Normal) => weight * self.landfill,
            (EventType::Empty, WasteType::Recycle) => {
                (weight * self.recycling) - (weight * self.avoided)
            }
        }
    }

    /// Emissions avoided by recycling `weight` kg.
    #[must_use]
    pub fn avoided_emissions(&self, weight: f64) -> f64 {
        weight * self.avoided
    }
}

impl Default for EmissionsFactors {
    fn default() -> Self {
        Self::new(
            DEFAULT_LANDFILL_FACTOR,
            DEFAULT_RECYCLING_FACTOR,
            DEFAULT_AVOIDED_FACTOR,
        )
    }
}
