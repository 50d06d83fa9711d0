//! Order types for all phases.
//!
//! Represents the closed set of orders: hold, move, support, convoy,
//! retreat, destroy, build, and waive. Orders reference units by type and
//! location; ownership is checked against the ledger at validation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::province::{Coast, ProvinceId};
use super::state::Phase;
use super::unit::UnitType;

/// A location on the board: a province with an optional coast specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub province: ProvinceId,
    pub coast: Coast,
}

impl Location {
    /// Creates a location without a coast.
    pub fn new(province: ProvinceId) -> Self {
        Self { province, coast: Coast::None }
    }

    /// Creates a location with a coast specifier.
    pub fn with_coast(province: ProvinceId, coast: Coast) -> Self {
        Self { province, coast }
    }
}

/// A unit reference in an order: the unit type and its current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderUnit {
    pub unit_type: UnitType,
    pub location: Location,
}

impl OrderUnit {
    /// Shorthand for an army reference.
    pub fn army(province: ProvinceId) -> Self {
        OrderUnit { unit_type: UnitType::Army, location: Location::new(province) }
    }

    /// Shorthand for a fleet reference.
    pub fn fleet(location: Location) -> Self {
        OrderUnit { unit_type: UnitType::Fleet, location }
    }
}

/// An order covering all three phase kinds.
///
/// Each variant carries exactly the data needed to unambiguously specify the
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Order {
    /// `A vie H`
    Hold { unit: OrderUnit },

    /// `A bud - rum`, or `A lon - nwy via C` when the army travels by convoy.
    Move {
        unit: OrderUnit,
        dest: Location,
        #[serde(default)]
        via_convoy: bool,
    },

    /// `A tyr S A vie H`
    SupportHold { unit: OrderUnit, supported: OrderUnit },

    /// `A gal S A bud - rum`
    SupportMove {
        unit: OrderUnit,
        supported: OrderUnit,
        dest: Location,
    },

    /// `F mao C A bre - spa`
    Convoy {
        unit: OrderUnit,
        convoyed_from: Location,
        convoyed_to: Location,
    },

    /// `A vie R boh`
    Retreat { unit: OrderUnit, dest: Location },

    /// `F tri D`: removal during adjustment, or voluntary disband while dislodged.
    Destroy { unit: OrderUnit },

    /// `A vie B` or `F stp/sc B`
    Build { unit: OrderUnit },

    /// `W`: voluntarily skip one build.
    Waive,
}

/// The discriminant of an order, used for phase checks and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Hold,
    Move,
    Support,
    Convoy,
    Retreat,
    Destroy,
    Build,
    Waive,
}

impl OrderKind {
    /// Returns true if orders of this kind may be submitted during `phase`.
    pub fn allowed_in(self, phase: Phase) -> bool {
        match phase {
            Phase::Movement => matches!(
                self,
                OrderKind::Hold | OrderKind::Move | OrderKind::Support | OrderKind::Convoy
            ),
            Phase::Retreat => matches!(self, OrderKind::Retreat | OrderKind::Destroy),
            Phase::Adjustment => {
                matches!(self, OrderKind::Build | OrderKind::Destroy | OrderKind::Waive)
            }
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderKind::Hold => "hold",
            OrderKind::Move => "move",
            OrderKind::Support => "support",
            OrderKind::Convoy => "convoy",
            OrderKind::Retreat => "retreat",
            OrderKind::Destroy => "destroy",
            OrderKind::Build => "build",
            OrderKind::Waive => "waive",
        };
        f.write_str(s)
    }
}

impl Order {
    /// Returns the kind of this order.
    pub fn kind(&self) -> OrderKind {
        match self {
            Order::Hold { .. } => OrderKind::Hold,
            Order::Move { .. } => OrderKind::Move,
            Order::SupportHold { .. } | Order::SupportMove { .. } => OrderKind::Support,
            Order::Convoy { .. } => OrderKind::Convoy,
            Order::Retreat { .. } => OrderKind::Retreat,
            Order::Destroy { .. } => OrderKind::Destroy,
            Order::Build { .. } => OrderKind::Build,
            Order::Waive => OrderKind::Waive,
        }
    }

    /// Returns the ordered unit, if the order names one.
    pub fn unit(&self) -> Option<OrderUnit> {
        match *self {
            Order::Hold { unit }
            | Order::Move { unit, .. }
            | Order::SupportHold { unit, .. }
            | Order::SupportMove { unit, .. }
            | Order::Convoy { unit, .. }
            | Order::Retreat { unit, .. }
            | Order::Destroy { unit }
            | Order::Build { unit } => Some(unit),
            Order::Waive => None,
        }
    }

    /// Returns the province of the ordered unit, if any.
    pub fn province(&self) -> Option<ProvinceId> {
        self.unit().map(|u| u.location.province)
    }

    /// Every location the order names, the ordered unit's first.
    pub fn locations(&self) -> Vec<Location> {
        match *self {
            Order::Hold { unit } | Order::Destroy { unit } | Order::Build { unit } => vec![unit.location],
            Order::Move { unit, dest, .. } | Order::Retreat { unit, dest } => vec![unit.location, dest],
            Order::SupportHold { unit, supported } => vec![unit.location, supported.location],
            Order::SupportMove { unit, supported, dest } => vec![unit.location, supported.location, dest],
            Order::Convoy { unit, convoyed_from, convoyed_to } => {
                vec![unit.location, convoyed_from, convoyed_to]
            }
            Order::Waive => Vec::new(),
        }
    }
}
