//! The loaded, immutable board for one variant.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use super::adjacency::AdjacencyIndex;
use super::order::{Location, Order, OrderUnit};
use super::province::{Coast, PowerId, ProvinceId, ProvinceInfo};
use super::unit::Unit;
use super::variant::VariantDef;

/// Static map data: provinces, adjacency, powers and the opening position.
///
/// Built once per variant by [`load_variant`](super::load_variant) or
/// [`Board::from_json`] and shared read-only between games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VariantDef", into = "VariantDef")]
pub struct Board {
    name: String,
    start_year: u16,
    win_threshold: usize,
    powers: Vec<String>,
    provinces: Vec<ProvinceInfo>,
    adjacency: AdjacencyIndex,
    starting_units: Vec<Unit>,
    by_abbr: HashMap<String, ProvinceId>,
}

impl Board {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn from_parts(
        name: String,
        start_year: u16,
        win_threshold: usize,
        powers: Vec<String>,
        provinces: Vec<ProvinceInfo>,
        adjacency: AdjacencyIndex,
        starting_units: Vec<Unit>,
        by_abbr: HashMap<String, ProvinceId>,
    ) -> Board {
        Board {
            name,
            start_year,
            win_threshold,
            powers,
            provinces,
            adjacency,
            starting_units,
            by_abbr,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_year(&self) -> u16 {
        self.start_year
    }

    /// Number of controlled centers needed for a solo victory.
    pub fn win_threshold(&self) -> usize {
        self.win_threshold
    }

    pub fn powers(&self) -> &[String] {
        &self.powers
    }

    pub fn power_count(&self) -> usize {
        self.powers.len()
    }

    /// Iterates over every power id.
    pub fn power_ids(&self) -> impl Iterator<Item = PowerId> {
        (0..self.powers.len() as u8).map(PowerId)
    }

    /// Looks up a power by name.
    pub fn power(&self, name: &str) -> Option<PowerId> {
        self.powers
            .iter()
            .position(|p| p == name)
            .map(|i| PowerId(i as u8))
    }

    pub fn power_name(&self, power: PowerId) -> &str {
        &self.powers[power.index()]
    }

    pub fn province_count(&self) -> usize {
        self.provinces.len()
    }

    /// Iterates over every province id in index order.
    pub fn province_ids(&self) -> impl Iterator<Item = ProvinceId> {
        (0..self.provinces.len() as u16).map(ProvinceId)
    }

    /// Looks up a province by abbreviation.
    pub fn province(&self, abbr: &str) -> Option<ProvinceId> {
        self.by_abbr.get(abbr).copied()
    }

    /// Parses `abbr` or `abbr/coast` into a location on this board.
    pub fn location(&self, spec: &str) -> Option<Location> {
        let (abbr, coast) = spec.split_once('/').unwrap_or((spec, ""));
        let province = self.province(abbr)?;
        let coast = Coast::from_abbr(coast)?;
        if coast != Coast::None && !self.info(province).coasts.contains(&coast) {
            return None;
        }
        Some(Location::with_coast(province, coast))
    }

    /// Panics if `province` is not on this board; see [`Board::get_info`].
    pub fn info(&self, province: ProvinceId) -> &ProvinceInfo {
        &self.provinces[province.index()]
    }

    pub fn get_info(&self, province: ProvinceId) -> Option<&ProvinceInfo> {
        self.provinces.get(province.index())
    }

    pub fn contains(&self, province: ProvinceId) -> bool {
        province.index() < self.provinces.len()
    }

    /// Abbreviation of `province`, or `?` if it is not on this board.
    pub fn abbr(&self, province: ProvinceId) -> &str {
        self.get_info(province).map_or("?", |info| info.abbr.as_str())
    }

    /// Renders a location as `abbr` or `abbr/coast`. Ids off the board
    /// render as `#id`.
    pub fn location_name(&self, loc: Location) -> String {
        let abbr = match self.get_info(loc.province) {
            Some(info) => info.abbr.clone(),
            None => format!("#{}", loc.province.0),
        };
        match loc.coast {
            Coast::None => abbr,
            c => format!("{}/{}", abbr, c.abbr()),
        }
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    pub fn starting_units(&self) -> &[Unit] {
        &self.starting_units
    }

    /// Iterates over every supply center.
    pub fn supply_centers(&self) -> impl Iterator<Item = ProvinceId> + '_ {
        self.province_ids().filter(|&p| self.info(p).is_supply_center)
    }

    /// Returns the home centers of a power, in province order.
    pub fn home_centers(&self, power: PowerId) -> Vec<ProvinceId> {
        self.province_ids()
            .filter(|&p| self.info(p).home_power == Some(power))
            .collect()
    }

    /// Breadth-first distance from the nearest source over any edge,
    /// ignoring unit kind. `None` marks unreachable provinces.
    pub fn distances_from(&self, sources: &[ProvinceId]) -> Vec<Option<u32>> {
        let mut dist = vec![None; self.provinces.len()];
        let mut queue = VecDeque::new();
        for &s in sources {
            if dist[s.index()].is_none() {
                dist[s.index()] = Some(0);
                queue.push_back(s);
            }
        }
        while let Some(p) = queue.pop_front() {
            let d = dist[p.index()].unwrap_or(0);
            for adj in self.adjacency.adj_from(p) {
                if dist[adj.to.index()].is_none() {
                    dist[adj.to.index()] = Some(d + 1);
                    queue.push_back(adj.to);
                }
            }
        }
        dist
    }

    fn unit_name(&self, unit: OrderUnit) -> String {
        format!("{} {}", unit.unit_type.abbr_char(), self.location_name(unit.location))
    }

    /// Renders an order in compact notation, e.g. `A vie - bud` or
    /// `F nth C A lon - nwy`.
    pub fn describe_order(&self, order: &Order) -> String {
        match *order {
            Order::Hold { unit } => format!("{} H", self.unit_name(unit)),
            Order::Move { unit, dest, via_convoy } => {
                let suffix = if via_convoy { " via C" } else { "" };
                format!("{} - {}{}", self.unit_name(unit), self.location_name(dest), suffix)
            }
            Order::SupportHold { unit, supported } => {
                format!("{} S {} H", self.unit_name(unit), self.unit_name(supported))
            }
            Order::SupportMove { unit, supported, dest } => format!(
                "{} S {} - {}",
                self.unit_name(unit),
                self.unit_name(supported),
                self.location_name(dest)
            ),
            Order::Convoy { unit, convoyed_from, convoyed_to } => format!(
                "{} C A {} - {}",
                self.unit_name(unit),
                self.location_name(convoyed_from),
                self.location_name(convoyed_to)
            ),
            Order::Retreat { unit, dest } => {
                format!("{} R {}", self.unit_name(unit), self.location_name(dest))
            }
            Order::Destroy { unit } => format!("{} D", self.unit_name(unit)),
            Order::Build { unit } => format!("{} B", self.unit_name(unit)),
            Order::Waive => "W".to_string(),
        }
    }
}
