//! Unit types and ownership.
//!
//! Represents armies and fleets, their owning power, and their current
//! position on the board.

use serde::{Deserialize, Serialize};

use super::order::Location;
use super::province::{Coast, PowerId, ProvinceId};

/// The type of a military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Army,
    Fleet,
}

impl UnitType {
    /// Returns the uppercase abbreviation used in order notation.
    pub const fn abbr_char(self) -> char {
        match self {
            UnitType::Army => 'A',
            UnitType::Fleet => 'F',
        }
    }

    /// Parses a unit type from its lowercase name.
    pub fn from_name(name: &str) -> Option<UnitType> {
        match name {
            "army" => Some(UnitType::Army),
            "fleet" => Some(UnitType::Fleet),
            _ => None,
        }
    }
}

/// A military unit on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub unit_type: UnitType,
    pub power: PowerId,
    pub province: ProvinceId,
    pub coast: Coast,
}

impl Unit {
    /// Returns the unit's location including coast.
    pub fn location(&self) -> Location {
        Location::with_coast(self.province, self.coast)
    }

    /// Returns a copy of the unit standing at `location`.
    pub fn moved_to(self, location: Location) -> Unit {
        let coast = match self.unit_type {
            UnitType::Army => Coast::None,
            UnitType::Fleet => location.coast,
        };
        Unit {
            province: location.province,
            coast,
            ..self
        }
    }
}
