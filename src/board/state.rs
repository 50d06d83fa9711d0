//! Mutable per-game state: seasons, phases and the power/unit ledger.
//!
//! The ledger keeps occupancy and supply-center control as two independent
//! per-province tables. Control is only ever written by the movement
//! resolver (on a successful foreign move-in) and by setup; vacating a
//! province never touches it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::map::Board;
use super::order::Location;
use super::province::{PowerId, ProvinceId};
use super::unit::Unit;

/// The season of a game turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Autumn,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Season::Spring => "spring",
            Season::Autumn => "autumn",
        })
    }
}

/// The phase within a game turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Movement,
    Retreat,
    Adjustment,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Movement => "movement",
            Phase::Retreat => "retreat",
            Phase::Adjustment => "adjustment",
        })
    }
}

/// A unit forced out of its province, awaiting a retreat order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DislodgedUnit {
    pub unit: Unit,
    pub attacker_from: ProvinceId,
    /// Legal destinations, fixed when the unit was dislodged.
    pub retreats: Vec<Location>,
}

/// Occupancy, control and liveness for every power in one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Unit standing in each province.
    pub units: Vec<Option<Unit>>,
    /// Controller of each supply center; always `None` for other provinces.
    pub control: Vec<Option<PowerId>>,
    /// Dislodged unit per province, only populated between a movement
    /// phase and its retreat phase.
    pub dislodged: Vec<Option<DislodgedUnit>>,
    /// Liveness per power.
    pub alive: Vec<bool>,
}

impl Ledger {
    /// Creates a ledger with no units and no controlled centers.
    pub fn empty(board: &Board) -> Self {
        let n = board.province_count();
        Ledger {
            units: vec![None; n],
            control: vec![None; n],
            dislodged: vec![None; n],
            alive: vec![true; board.power_count()],
        }
    }

    /// Creates the opening ledger: starting units placed and every home
    /// center controlled by its owner.
    pub fn initial(board: &Board) -> Self {
        let mut ledger = Ledger::empty(board);
        for unit in board.starting_units() {
            ledger.place_unit(*unit);
        }
        for p in board.supply_centers() {
            ledger.control[p.index()] = board.info(p).home_power;
        }
        ledger
    }

    /// Places a unit. Returns false if the province is already occupied.
    pub fn place_unit(&mut self, unit: Unit) -> bool {
        let slot = &mut self.units[unit.province.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(unit);
        true
    }

    pub fn remove_unit(&mut self, province: ProvinceId) -> Option<Unit> {
        self.units[province.index()].take()
    }

    pub fn unit_at(&self, province: ProvinceId) -> Option<Unit> {
        self.units.get(province.index()).copied().flatten()
    }

    pub fn controller(&self, province: ProvinceId) -> Option<PowerId> {
        self.control.get(province.index()).copied().flatten()
    }

    /// Sets the controller of a supply center.
    pub fn set_controller(&mut self, province: ProvinceId, power: Option<PowerId>) {
        self.control[province.index()] = power;
    }

    /// Iterates over all units on the board in province order.
    pub fn all_units(&self) -> impl Iterator<Item = Unit> + '_ {
        self.units.iter().flatten().copied()
    }

    /// Returns the power's units in province order.
    pub fn units_of(&self, power: PowerId) -> Vec<Unit> {
        self.all_units().filter(|u| u.power == power).collect()
    }

    pub fn unit_count(&self, power: PowerId) -> usize {
        self.all_units().filter(|u| u.power == power).count()
    }

    /// Returns the supply centers controlled by a power, in province order.
    pub fn controlled_centers(&self, power: PowerId) -> Vec<ProvinceId> {
        self.control
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Some(power))
            .map(|(i, _)| ProvinceId(i as u16))
            .collect()
    }

    pub fn center_count(&self, power: PowerId) -> usize {
        self.control.iter().filter(|c| **c == Some(power)).count()
    }

    pub fn is_alive(&self, power: PowerId) -> bool {
        self.alive.get(power.index()).copied().unwrap_or(false)
    }

    /// Returns the number of powers still alive.
    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|a| **a).count()
    }

    pub fn set_dislodged(&mut self, dislodged: DislodgedUnit) {
        let idx = dislodged.unit.province.index();
        self.dislodged[idx] = Some(dislodged);
    }

    pub fn has_dislodged(&self) -> bool {
        self.dislodged.iter().any(|d| d.is_some())
    }

    /// Iterates over dislodged units in province order.
    pub fn dislodged_units(&self) -> impl Iterator<Item = &DislodgedUnit> {
        self.dislodged.iter().flatten()
    }

    pub fn clear_dislodged(&mut self) {
        self.dislodged.iter_mut().for_each(|d| *d = None);
    }
}
