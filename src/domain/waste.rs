//! Closed vocabularies for bins, events, and empty targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::LedgerError;

/// The two physical bins tracked by the ledger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum WasteType {
    /// General waste, routed to landfill.
    Normal,
    /// Recyclable waste, diverted from landfill.
    Recycle,
}

impl WasteType {
    /// Both bins, in the order they are emptied by a `both` request.
    pub const ALL: [Self; 2] = [Self::Normal, Self::Recycle];

    /// Wire name of the waste type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Recycle => "recycle",
        }
    }
}

impl fmt::Display for WasteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WasteType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "recycle" => Ok(Self::Recycle),
            _ => Err(LedgerError::InvalidWasteType(s.to_string())),
        }
    }
}

/// Kind of event recorded in the trash log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Waste deposited into a bin.
    Add,
    /// Bin emptied and its contents processed.
    Empty,
}

impl EventType {
    /// Wire name of the event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "empty" => Ok(Self::Empty),
            _ => Err(LedgerError::InvalidInput(format!(
                "invalid event_type {s:?}: must be \"add\" or \"empty\""
            ))),
        }
    }
}

/// Which bin(s) an empty request applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTarget {
    /// Only the general waste bin.
    Normal,
    /// Only the recycling bin.
    Recycle,
    /// Both bins as one atomic unit.
    #[default]
    Both,
}

impl EmptyTarget {
    /// Bins affected by this target, normal first.
    #[must_use]
    pub fn waste_types(self) -> &'static [WasteType] {
        match self {
            Self::Normal => &[WasteType::Normal],
            Self::Recycle => &[WasteType::Recycle],
            Self::Both => &WasteType::ALL,
        }
    }

    /// Wire name of the target.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Recycle => "recycle",
            Self::Both => "both",
        }
    }
}

impl From<WasteType> for EmptyTarget {
    fn from(waste_type: WasteType) -> Self {
        match waste_type {
            WasteType::Normal => Self::Normal,
            WasteType::Recycle => Self::Recycle,
        }
    }
}

impl fmt::Display for EmptyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmptyTarget {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "recycle" => Ok(Self::Recycle),
            "both" => Ok(Self::Both),
            _ => Err(LedgerError::InvalidEmptyTarget(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn waste_type_parses_case_insensitively() {
        let Ok(parsed) = "Recycle".parse::<WasteType>() else {
            panic!("expected recycle");
        };
        assert_eq!(parsed, WasteType::Recycle);
        assert_eq!(" NORMAL ".parse::<WasteType>().ok(), Some(WasteType::Normal));
    }

    #[test]
    fn unknown_waste_type_is_rejected() {
        let result = "glass".parse::<WasteType>();
        assert!(matches!(result, Err(LedgerError::InvalidWasteType(s)) if s == "glass"));
    }

    #[test]
    fn empty_target_covers_both_bins() {
        assert_eq!(EmptyTarget::Both.waste_types(), &WasteType::ALL);
        assert_eq!(EmptyTarget::Normal.waste_types(), &[WasteType::Normal]);
        assert_eq!(EmptyTarget::default(), EmptyTarget::Both);
    }

    #[test]
    fn unknown_empty_target_is_rejected() {
        assert!(matches!(
            "everything".parse::<EmptyTarget>(),
            Err(LedgerError::InvalidEmptyTarget(_))
        ));
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&EventType::Empty).unwrap_or_default();
        assert_eq!(json, "\"empty\"");
        let parsed: Result<WasteType, _> = serde_json::from_str("\"recycle\"");
        assert_eq!(parsed.ok(), Some(WasteType::Recycle));
    }
}
