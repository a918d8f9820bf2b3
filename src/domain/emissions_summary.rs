//! Running Scope 3 emissions totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::emissions::EmissionsFactors;
use super::waste::WasteType;

/// Cumulative emissions since the ledger was initialized.
///
/// Every field except `net_co2_emissions` is non-decreasing.
/// `total_co2_recycling` is gross processing emissions and only ever
/// receives non-negative contributions, while `net_co2_emissions` carries
/// the full signed value and goes negative when recycling dominates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmissionsSummary {
    /// kg CO2e from landfilled general waste.
    pub total_co2_landfill: f64,
    /// kg CO2e from recycling processing.
    pub total_co2_recycling: f64,
    /// kg CO2e avoided by recycling.
    pub total_co2_avoided: f64,
    /// Net kg CO2e (may be negative).
    pub net_co2_emissions: f64,
    /// kg of waste diverted from landfill.
    pub total_waste_diverted: f64,
    /// Timestamp of the last update.
    pub last_updated: DateTime<Utc>,
}

impl EmissionsSummary {
    /// Creates an all-zero summary.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            total_co2_landfill: 0.0,
            total_co2_recycling: 0.0,
            total_co2_avoided: 0.0,
            net_co2_emissions: 0.0,
            total_waste_diverted: 0.0,
            last_updated: now,
        }
    }

    /// Whether every total is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [
            self.total_co2_landfill,
            self.total_co2_recycling,
            self.total_co2_avoided,
            self.net_co2_emissions,
            self.total_waste_diverted,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Folds one emptied bin into the totals.
    ///
    /// `co2_value` is the signed result of
    /// [`EmissionsFactors::compute_emissions`] for the pre-reset `weight`.
    /// Emptying an already empty bin changes nothing, not even
    /// `last_updated`. Returns whether the summary changed.
    pub fn record_empty(
        &mut self,
        waste_type: WasteType,
        weight: f64,
        co2_value: f64,
        factors: &EmissionsFactors,
        now: DateTime<Utc>,
    ) -> bool {
        if weight <= 0.0 {
            return false;
        }
        match waste_type {
            WasteType::Normal => {
                self.total_co2_landfill += co2_value;
            }
            WasteType::Recycle => {
                self.total_co2_recycling += co2_value.max(0.0);
                self.total_co2_avoided += factors.avoided_emissions(weight);
                self.total_waste_diverted += weight;
            }
        }
        self.net_co2_emissions += co2_value;
        self.last_updated = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::waste::EventType;

    fn empty_with(summary: &mut EmissionsSummary, waste_type: WasteType, weight: f64) -> bool {
        let factors = EmissionsFactors::default();
        let co2 = factors.compute_emissions(weight, waste_type, EventType::Empty);
        summary.record_empty(waste_type, weight, co2, &factors, Utc::now())
    }

    #[test]
    fn landfill_updates_landfill_and_net() {
        let mut summary = EmissionsSummary::new(Utc::now());
        assert!(empty_with(&mut summary, WasteType::Normal, 10.0));

        assert_eq!(summary.total_co2_landfill, 5.0);
        assert_eq!(summary.net_co2_emissions, 5.0);
        assert_eq!(summary.total_co2_recycling, 0.0);
        assert_eq!(summary.total_waste_diverted, 0.0);
    }

    #[test]
    fn recycling_only_accumulates_positive_processing_emissions() {
        let mut summary = EmissionsSummary::new(Utc::now());
        assert!(empty_with(&mut summary, WasteType::Recycle, 10.0));

        assert_eq!(summary.total_co2_recycling, 0.0);
        assert_eq!(summary.total_co2_avoided, 20.0);
        assert_eq!(summary.net_co2_emissions, -19.0);
        assert_eq!(summary.total_waste_diverted, 10.0);
    }

    #[test]
    fn positive_recycling_value_reaches_gross_total() {
        let factors = EmissionsFactors::new(0.5, 3.0, 1.0);
        let mut summary = EmissionsSummary::new(Utc::now());
        let co2 = factors.compute_emissions(2.0, WasteType::Recycle, EventType::Empty);
        summary.record_empty(WasteType::Recycle, 2.0, co2, &factors, Utc::now());

        assert_eq!(summary.total_co2_recycling, 4.0);
        assert_eq!(summary.total_co2_avoided, 2.0);
        assert_eq!(summary.net_co2_emissions, 4.0);
    }

    #[test]
    fn zero_weight_leaves_summary_untouched() {
        let created = Utc::now();
        let mut summary = EmissionsSummary::new(created);
        let before = summary.clone();

        assert!(!empty_with(&mut summary, WasteType::Recycle, 0.0));
        assert!(!empty_with(&mut summary, WasteType::Normal, 0.0));
        assert_eq!(summary, before);
    }

    #[test]
    fn net_combines_both_streams() {
        let mut summary = EmissionsSummary::new(Utc::now());
        empty_with(&mut summary, WasteType::Normal, 10.0);
        empty_with(&mut summary, WasteType::Recycle, 10.0);
        assert_eq!(summary.net_co2_emissions, -14.0);
    }
}
