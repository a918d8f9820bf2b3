//! Domain layer: waste vocabulary, emissions accounting, and ledger state.
//!
//! This module contains the accounting core: the emissions calculator,
//! the bin state ledger, the emissions summary accumulator, the log entry
//! model, and the pure transitions that tie them together.

pub mod bin_state;
pub mod emissions;
pub mod emissions_summary;
pub mod ledger;
pub mod trash_log;
pub mod waste;

pub use bin_state::{BinContents, BinState};
pub use emissions::EmissionsFactors;
pub use emissions_summary::EmissionsSummary;
pub use ledger::{LedgerState, LedgerTransition};
pub use trash_log::{NewLogEntry, TrashLogEntry};
pub use waste::{EmptyTarget, EventType, WasteType};
