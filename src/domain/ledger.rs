//! Pure ledger transitions over the combined bin and summary state.
//!
//! [`LedgerState`] bundles the two singleton records that every mutation
//! must update together. Operations never mutate a live state in place:
//! they produce a [`LedgerTransition`] holding the complete next state and
//! the log entries to append, which the service commits to the store as
//! one unit before swapping it in.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::bin_state::BinState;
use super::emissions::EmissionsFactors;
use super::emissions_summary::EmissionsSummary;
use super::trash_log::NewLogEntry;
use super::waste::{EmptyTarget, EventType, WasteType};
use crate::error::LedgerError;

/// Bin state and emissions summary, always updated together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerState {
    /// Current bin contents.
    pub bin: BinState,
    /// Running emissions totals.
    pub summary: EmissionsSummary,
}

/// Outcome of a planned mutation, not yet committed.
#[derive(Debug, Clone)]
pub struct LedgerTransition {
    /// State after the mutation.
    pub next: LedgerState,
    /// Entries to append to the log, in order.
    pub entries: Vec<NewLogEntry>,
    /// Whether `next.summary` differs from the current summary.
    pub summary_changed: bool,
}

impl LedgerState {
    /// Creates the zero state written at first initialization.
    #[must_use]
    pub fn initial(normal_capacity: f64, recycle_capacity: f64, now: DateTime<Utc>) -> Self {
        Self {
            bin: BinState::new(normal_capacity, recycle_capacity, now),
            summary: EmissionsSummary::new(now),
        }
    }

    /// Plans depositing waste into a bin.
    ///
    /// Logs an `add` entry with zero emissions and leaves the summary alone.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidInput`] unless both `volume` and
    /// `weight` are finite and strictly positive, or if the bin totals
    /// would overflow.
    pub fn plan_add(
        &self,
        waste_type: WasteType,
        volume: f64,
        weight: f64,
        factors: &EmissionsFactors,
        now: DateTime<Utc>,
    ) -> Result<LedgerTransition, LedgerError> {
        validate_amount("volume", volume)?;
        validate_amount("weight", weight)?;

        let mut next = self.clone();
        next.bin.deposit(waste_type, volume, weight, now);
        if !next.bin.is_finite() {
            return Err(LedgerError::InvalidInput(format!(
                "adding {volume} volume and {weight} weight overflows the {waste_type} bin"
            )));
        }

        let entry = NewLogEntry {
            batch_id: Uuid::new_v4(),
            waste_type,
            volume,
            weight,
            event_type: EventType::Add,
            co2_emissions: factors.compute_emissions(weight, waste_type, EventType::Add),
            timestamp: now,
        };

        Ok(LedgerTransition {
            next,
            entries: vec![entry],
            summary_changed: false,
        })
    }

    /// Plans emptying one or both bins.
    ///
    /// Each emptied bin yields one `empty` entry recording the pre-reset
    /// volume and weight together with the emissions computed from that
    /// weight. Emptying an already empty bin is valid and logs a zero entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidInput`] if an emissions value or
    /// running total would overflow; nothing is emptied in that case.
    pub fn plan_empty(
        &self,
        target: EmptyTarget,
        factors: &EmissionsFactors,
        now: DateTime<Utc>,
    ) -> Result<LedgerTransition, LedgerError> {
        let batch_id = Uuid::new_v4();
        let mut next = self.clone();
        let mut entries = Vec::with_capacity(target.waste_types().len());
        let mut summary_changed = false;

        for &waste_type in target.waste_types() {
            let emptied = next.bin.reset(waste_type, now);
            let co2 = factors.compute_emissions(emptied.weight, waste_type, EventType::Empty);
            if !co2.is_finite() {
                return Err(LedgerError::InvalidInput(format!(
                    "emptying {} kg from the {waste_type} bin overflows its emissions",
                    emptied.weight
                )));
            }
            summary_changed |= next
                .summary
                .record_empty(waste_type, emptied.weight, co2, factors, now);

            entries.push(NewLogEntry {
                batch_id,
                waste_type,
                volume: emptied.volume,
                weight: emptied.weight,
                event_type: EventType::Empty,
                co2_emissions: co2,
                timestamp: now,
            });
        }

        if !next.summary.is_finite() {
            return Err(LedgerError::InvalidInput(
                "emptying would overflow the emissions totals".to_string(),
            ));
        }

        Ok(LedgerTransition {
            next,
            entries,
            summary_changed,
        })
    }
}

/// Rejects zero, negative, and non-finite amounts.
fn validate_amount(field: &str, value: f64) -> Result<(), LedgerError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LedgerError::InvalidInput(format!(
            "{field} must be a positive number, got {value}"
        )))
    }
}
