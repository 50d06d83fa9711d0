//! Province and power identifiers plus per-province metadata.
//!
//! Provinces and powers are addressed by small index newtypes into the
//! loaded `Board`, so every per-province table in the crate is a plain
//! `Vec` indexed by `ProvinceId::index()`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::unit::UnitType;

/// Index of a province within its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvinceId(pub u16);

impl ProvinceId {
    /// Returns the index for per-province tables.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a power within its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerId(pub u8);

impl PowerId {
    /// Returns the index for per-power tables.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Coast specifier for split-coast provinces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coast {
    None,
    North,
    South,
    East,
}

impl Coast {
    /// Returns the 2-letter abbreviation (empty string for None).
    pub const fn abbr(self) -> &'static str {
        match self {
            Coast::None => "",
            Coast::North => "nc",
            Coast::South => "sc",
            Coast::East => "ec",
        }
    }

    /// Parses a coast from its 2-letter abbreviation.
    pub fn from_abbr(s: &str) -> Option<Coast> {
        match s {
            "" => Some(Coast::None),
            "nc" => Some(Coast::North),
            "sc" => Some(Coast::South),
            "ec" => Some(Coast::East),
            _ => Option::None,
        }
    }
}

/// Classifies a province by terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Land,
    Coast,
    Sea,
}

impl Terrain {
    /// Returns whether a unit of the given type may stand on this terrain.
    pub const fn allows(self, unit_type: UnitType) -> bool {
        !matches!(
            (unit_type, self),
            (UnitType::Army, Terrain::Sea) | (UnitType::Fleet, Terrain::Land)
        )
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Terrain::Land => "land",
            Terrain::Coast => "coast",
            Terrain::Sea => "sea",
        };
        f.write_str(s)
    }
}

/// Static metadata for a province, fixed once the variant is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvinceInfo {
    pub abbr: String,
    pub name: String,
    pub terrain: Terrain,
    pub is_supply_center: bool,
    pub home_power: Option<PowerId>,
    /// Coasts of a split-coast province, empty otherwise.
    pub coasts: Vec<Coast>,
}

impl ProvinceInfo {
    /// Returns true if this province has split coasts.
    pub fn has_coasts(&self) -> bool {
        !self.coasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coast_abbr_roundtrip() {
        for c in [Coast::None, Coast::North, Coast::South, Coast::East] {
            assert_eq!(Coast::from_abbr(c.abbr()), Some(c));
        }
        assert_eq!(Coast::from_abbr("wc"), None);
    }

    #[test]
    fn terrain_occupancy_rules() {
        assert!(Terrain::Land.allows(UnitType::Army));
        assert!(!Terrain::Land.allows(UnitType::Fleet));
        assert!(Terrain::Coast.allows(UnitType::Army));
        assert!(Terrain::Coast.allows(UnitType::Fleet));
        assert!(!Terrain::Sea.allows(UnitType::Army));
        assert!(Terrain::Sea.allows(UnitType::Fleet));
    }

    #[test]
    fn ids_index_directly() {
        assert_eq!(ProvinceId(42).index(), 42);
        assert_eq!(PowerId(3).index(), 3);
    }
}
