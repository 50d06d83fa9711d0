//! Variant definitions: the JSON map schema and its loader.
//!
//! A variant lists provinces, undirected edges tagged with the unit kinds
//! that may cross them, the playing powers, and starting units. Loading
//! validates the definition and produces an immutable [`Board`].

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::adjacency::{AdjacencyEntry, AdjacencyIndex};
use super::map::Board;
use super::order::Location;
use super::province::{Coast, PowerId, ProvinceId, ProvinceInfo, Terrain};
use super::unit::{Unit, UnitType};

const STANDARD: &str = include_str!("../../variants/standard.json");

/// Errors raised while loading or validating a variant.
#[derive(Error, Debug)]
pub enum VariantError {
    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate province id: {0}")]
    DuplicateProvince(String),

    #[error("duplicate power: {0}")]
    DuplicatePower(String),

    #[error("unknown province: {0}")]
    UnknownProvince(String),

    #[error("unknown power: {0}")]
    UnknownPower(String),

    #[error("bad coast in location: {0}")]
    BadCoast(String),

    #[error("edge {0} connects a province to itself")]
    SelfEdge(String),

    #[error("edge {0} is not passable for its unit kind")]
    ImpassableEdge(String),

    #[error("home center {0} is not a supply center")]
    HomeNotSupplyCenter(String),

    #[error("illegal starting unit at {0}")]
    IllegalStartingUnit(String),

    #[error("win threshold must be positive")]
    InvalidThreshold,

    #[error("too many {0}")]
    TooMany(&'static str),
}

/// Which unit kinds may cross an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeUnits {
    Army,
    Fleet,
    Both,
}

impl EdgeUnits {
    fn flags(self) -> (bool, bool) {
        match self {
            EdgeUnits::Army => (true, false),
            EdgeUnits::Fleet => (false, true),
            EdgeUnits::Both => (true, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceDef {
    pub id: String,
    pub name: String,
    pub terrain: Terrain,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub supply_center: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coasts: Vec<String>,
}

/// An undirected edge; endpoints are `abbr` or `abbr/coast`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDef {
    pub a: String,
    pub b: String,
    pub units: EdgeUnits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingUnitDef {
    pub power: String,
    pub kind: UnitType,
    pub at: String,
}

/// The on-disk variant schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDef {
    pub name: String,
    pub start_year: u16,
    pub win_threshold: usize,
    pub powers: Vec<String>,
    pub provinces: Vec<ProvinceDef>,
    pub edges: Vec<EdgeDef>,
    #[serde(default)]
    pub starting_units: Vec<StartingUnitDef>,
}

/// Loads a built-in variant by name.
pub fn load_variant(name: &str) -> Result<Board, VariantError> {
    match name {
        "standard" => Board::from_json(STANDARD),
        other => Err(VariantError::UnknownVariant(other.to_string())),
    }
}

impl Board {
    /// Parses and validates a variant from a JSON string.
    pub fn from_json(json: &str) -> Result<Board, VariantError> {
        let def: VariantDef = serde_json::from_str(json)?;
        Board::try_from(def)
    }

    /// Reads and validates a variant from a JSON file.
    pub fn from_file(path: &Path) -> Result<Board, VariantError> {
        let json = std::fs::read_to_string(path)?;
        Board::from_json(&json)
    }
}

impl TryFrom<VariantDef> for Board {
    type Error = VariantError;

    fn try_from(def: VariantDef) -> Result<Board, VariantError> {
        if def.win_threshold == 0 {
            return Err(VariantError::InvalidThreshold);
        }
        if def.provinces.len() > u16::MAX as usize {
            return Err(VariantError::TooMany("provinces"));
        }
        if def.powers.len() > u8::MAX as usize {
            return Err(VariantError::TooMany("powers"));
        }

        let mut power_ids: HashMap<&str, PowerId> = HashMap::new();
        for (i, name) in def.powers.iter().enumerate() {
            if power_ids.insert(name.as_str(), PowerId(i as u8)).is_some() {
                return Err(VariantError::DuplicatePower(name.clone()));
            }
        }

        let mut by_abbr: HashMap<String, ProvinceId> = HashMap::new();
        let mut provinces = Vec::with_capacity(def.provinces.len());
        for (i, p) in def.provinces.iter().enumerate() {
            if by_abbr.insert(p.id.clone(), ProvinceId(i as u16)).is_some() {
                return Err(VariantError::DuplicateProvince(p.id.clone()));
            }
            let home_power = match &p.home {
                Some(power) => {
                    if !p.supply_center {
                        return Err(VariantError::HomeNotSupplyCenter(p.id.clone()));
                    }
                    Some(
                        *power_ids
                            .get(power.as_str())
                            .ok_or_else(|| VariantError::UnknownPower(power.clone()))?,
                    )
                }
                None => None,
            };
            let mut coasts = Vec::with_capacity(p.coasts.len());
            for c in &p.coasts {
                match Coast::from_abbr(c) {
                    Some(coast) if coast != Coast::None && !coasts.contains(&coast) => {
                        coasts.push(coast)
                    }
                    _ => return Err(VariantError::BadCoast(format!("{}/{}", p.id, c))),
                }
            }
            if !coasts.is_empty() && p.terrain != Terrain::Coast {
                return Err(VariantError::BadCoast(p.id.clone()));
            }
            provinces.push(ProvinceInfo {
                abbr: p.id.clone(),
                name: p.name.clone(),
                terrain: p.terrain,
                is_supply_center: p.supply_center,
                home_power,
                coasts,
            });
        }

        let resolve = |spec: &str| -> Result<Location, VariantError> {
            let (abbr, coast) = match spec.split_once('/') {
                Some((abbr, c)) => (abbr, c),
                None => (spec, ""),
            };
            let id = *by_abbr
                .get(abbr)
                .ok_or_else(|| VariantError::UnknownProvince(abbr.to_string()))?;
            let coast = Coast::from_abbr(coast).ok_or_else(|| VariantError::BadCoast(spec.to_string()))?;
            if coast != Coast::None && !provinces[id.index()].coasts.contains(&coast) {
                return Err(VariantError::BadCoast(spec.to_string()));
            }
            Ok(Location::with_coast(id, coast))
        };

        let mut entries = Vec::with_capacity(def.edges.len() * 2);
        let mut seen = HashSet::new();
        for edge in &def.edges {
            let label = format!("{}-{}", edge.a, edge.b);
            let a = resolve(&edge.a)?;
            let b = resolve(&edge.b)?;
            if a.province == b.province {
                return Err(VariantError::SelfEdge(label));
            }
            let (army_ok, fleet_ok) = edge.units.flags();
            for end in [a, b] {
                let info = &provinces[end.province.index()];
                let army_bad = army_ok && (info.terrain == Terrain::Sea || end.coast != Coast::None);
                let fleet_bad = fleet_ok
                    && (info.terrain == Terrain::Land || (info.has_coasts() && end.coast == Coast::None));
                if army_bad || fleet_bad {
                    return Err(VariantError::ImpassableEdge(label));
                }
            }
            let entry = AdjacencyEntry {
                from: a.province,
                from_coast: a.coast,
                to: b.province,
                to_coast: b.coast,
                army_ok,
                fleet_ok,
            };
            if seen.insert((a, b, army_ok, fleet_ok)) {
                entries.push(entry);
                entries.push(entry.reversed());
            }
        }
        let adjacency = AdjacencyIndex::build(entries, provinces.len());

        let mut starting_units = Vec::with_capacity(def.starting_units.len());
        let mut occupied = HashSet::new();
        for u in &def.starting_units {
            let power = *power_ids
                .get(u.power.as_str())
                .ok_or_else(|| VariantError::UnknownPower(u.power.clone()))?;
            let loc = resolve(&u.at)?;
            let info = &provinces[loc.province.index()];
            let coast_ok = match u.kind {
                UnitType::Army => loc.coast == Coast::None,
                UnitType::Fleet => info.has_coasts() == (loc.coast != Coast::None),
            };
            if !info.terrain.allows(u.kind) || !coast_ok || !occupied.insert(loc.province) {
                return Err(VariantError::IllegalStartingUnit(u.at.clone()));
            }
            starting_units.push(Unit {
                unit_type: u.kind,
                power,
                province: loc.province,
                coast: loc.coast,
            });
        }

        Ok(Board::from_parts(
            def.name,
            def.start_year,
            def.win_threshold,
            def.powers,
            provinces,
            adjacency,
            starting_units,
            by_abbr,
        ))
    }
}

impl From<Board> for VariantDef {
    fn from(board: Board) -> VariantDef {
        let provinces = board
            .province_ids()
            .map(|p| {
                let info = board.info(p);
                ProvinceDef {
                    id: info.abbr.clone(),
                    name: info.name.clone(),
                    terrain: info.terrain,
                    supply_center: info.is_supply_center,
                    home: info.home_power.map(|pw| board.power_name(pw).to_string()),
                    coasts: info.coasts.iter().map(|c| c.abbr().to_string()).collect(),
                }
            })
            .collect();

        let edges = board
            .adjacency()
            .entries()
            .iter()
            .filter(|e| (e.from, e.from_coast) < (e.to, e.to_coast))
            .map(|e| EdgeDef {
                a: board.location_name(Location::with_coast(e.from, e.from_coast)),
                b: board.location_name(Location::with_coast(e.to, e.to_coast)),
                units: match (e.army_ok, e.fleet_ok) {
                    (true, false) => EdgeUnits::Army,
                    (false, true) => EdgeUnits::Fleet,
                    _ => EdgeUnits::Both,
                },
            })
            .collect();

        let starting_units = board
            .starting_units()
            .iter()
            .map(|u| StartingUnitDef {
                power: board.power_name(u.power).to_string(),
                kind: u.unit_type,
                at: board.location_name(u.location()),
            })
            .collect();

        VariantDef {
            name: board.name().to_string(),
            start_year: board.start_year(),
            win_threshold: board.win_threshold(),
            powers: board.powers().to_vec(),
            provinces,
            edges,
            starting_units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = r#"{
        "name": "tiny",
        "start_year": 2000,
        "win_threshold": 2,
        "powers": ["red", "blue"],
        "provinces": [
            {"id": "a", "name": "Alpha", "terrain": "coast", "supply_center": true, "home": "red"},
            {"id": "b", "name": "Bravo", "terrain": "land", "supply_center": true},
            {"id": "c", "name": "Charlie", "terrain": "coast", "supply_center": true, "home": "blue"},
            {"id": "s", "name": "Sea", "terrain": "sea"}
        ],
        "edges": [
            {"a": "a", "b": "b", "units": "army"},
            {"a": "b", "b": "c", "units": "army"},
            {"a": "a", "b": "s", "units": "fleet"},
            {"a": "c", "b": "s", "units": "fleet"}
        ],
        "starting_units": [
            {"power": "red", "kind": "army", "at": "a"},
            {"power": "blue", "kind": "fleet", "at": "c"}
        ]
    }"#;

    #[test]
    fn standard_variant_loads() {
        let board = load_variant("standard").unwrap();
        assert_eq!(board.province_count(), 75);
        assert_eq!(board.powers().len(), 7);
        assert_eq!(board.supply_centers().count(), 34);
        assert_eq!(board.starting_units().len(), 22);
        assert_eq!(board.win_threshold(), 18);
        assert_eq!(board.start_year(), 1901);
    }

    #[test]
    fn unknown_variant_rejected() {
        assert!(matches!(
            load_variant("atlantis"),
            Err(VariantError::UnknownVariant(_))
        ));
    }

    #[test]
    fn tiny_variant_loads() {
        let board = Board::from_json(TINY).unwrap();
        assert_eq!(board.name(), "tiny");
        assert_eq!(board.province_count(), 4);
        assert_eq!(board.adjacency().entries().len(), 8);
        let red = board.power("red").unwrap();
        assert_eq!(board.home_centers(red), vec![board.province("a").unwrap()]);
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(Board::from_json("{"), Err(VariantError::Json(_))));
    }

    #[test]
    fn self_edge_rejected() {
        let json = TINY.replace(r#"{"a": "b", "b": "c", "units": "army"}"#, r#"{"a": "b", "b": "b", "units": "army"}"#);
        assert!(matches!(Board::from_json(&json), Err(VariantError::SelfEdge(_))));
    }

    #[test]
    fn unknown_edge_province_rejected() {
        let json = TINY.replace(r#""b": "c", "units""#, r#""b": "zz", "units""#);
        assert!(matches!(Board::from_json(&json), Err(VariantError::UnknownProvince(p)) if p == "zz"));
    }

    #[test]
    fn army_edge_into_sea_rejected() {
        let json = TINY.replace(r#"{"a": "a", "b": "s", "units": "fleet"}"#, r#"{"a": "a", "b": "s", "units": "both"}"#);
        assert!(matches!(Board::from_json(&json), Err(VariantError::ImpassableEdge(_))));
    }

    #[test]
    fn home_must_be_supply_center() {
        let json = TINY.replace(
            r#""terrain": "coast", "supply_center": true, "home": "blue""#,
            r#""terrain": "coast", "home": "blue""#,
        );
        assert!(matches!(Board::from_json(&json), Err(VariantError::HomeNotSupplyCenter(p)) if p == "c"));
    }

    #[test]
    fn fleet_cannot_start_inland() {
        let json = TINY.replace(
            r#"{"power": "red", "kind": "army", "at": "a"}"#,
            r#"{"power": "red", "kind": "fleet", "at": "b"}"#,
        );
        assert!(matches!(Board::from_json(&json), Err(VariantError::IllegalStartingUnit(_))));
    }

    #[test]
    fn zero_threshold_rejected() {
        let json = TINY.replace(r#""win_threshold": 2"#, r#""win_threshold": 0"#);
        assert!(matches!(Board::from_json(&json), Err(VariantError::InvalidThreshold)));
    }

    #[test]
    fn board_serializes_as_variant() {
        let board = load_variant("standard").unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board, back);
    }
}
