//! Retreat-phase resolution.
//!
//! Resolves retreat orders: if two dislodged units retreat to the same province,
//! both are disbanded. Unordered dislodged units, and units whose order was
//! illegal, are disbanded too. Retreats never change supply-center control.

use tracing::debug;

use crate::board::{Board, Coast, Ledger, Location, Order, OrderUnit, PowerId, ProvinceId, UnitType};

use super::kruijswijk::Dislodgement;
use super::outcome::{sort_results, OrderOutcome, TurnResult};
use super::validate::{check_provinces, ValidationError};

/// Computes the legal retreat destinations of a dislodged unit.
///
/// `ledger` is the occupancy after movement. Excluded are occupied
/// provinces, provinces left empty by a standoff, and the attacker's origin
/// unless the attacker came by convoy. Fleets list each reachable coast.
pub fn retreat_destinations(
    board: &Board,
    ledger: &Ledger,
    dislodged: &Dislodgement,
    standoffs: &[bool],
) -> Vec<Location> {
    let unit = dislodged.unit;
    let is_fleet = unit.unit_type == UnitType::Fleet;
    let mut dests = Vec::new();

    for adj in board.adjacency().adj_from(unit.province) {
        let passable = if is_fleet { adj.fleet_ok } else { adj.army_ok };
        if !passable {
            continue;
        }
        if is_fleet && unit.coast != Coast::None && adj.from_coast != unit.coast {
            continue;
        }
        if adj.to == dislodged.attacker_from && !dislodged.by_convoy {
            continue;
        }
        if ledger.unit_at(adj.to).is_some() || standoffs.get(adj.to.index()).copied().unwrap_or(false) {
            continue;
        }
        let loc = if is_fleet {
            Location::with_coast(adj.to, adj.to_coast)
        } else {
            Location::new(adj.to)
        };
        if !dests.contains(&loc) {
            dests.push(loc);
        }
    }

    dests.sort();
    dests
}

/// The outcome of a retreat phase.
#[derive(Debug, Clone)]
pub struct RetreatResolution {
    pub ledger: Ledger,
    pub results: Vec<TurnResult>,
}

/// Accepted order for one dislodged unit.
#[derive(Debug, Clone, Copy)]
enum RetreatChoice {
    Retreat(Location),
    Disband,
}

/// Checks a retreat-phase order against the dislodged units.
fn check_retreat_order(
    board: &Board,
    ledger: &Ledger,
    power: PowerId,
    order: &Order,
) -> Result<(ProvinceId, RetreatChoice), ValidationError> {
    let (unit, dest) = match *order {
        Order::Retreat { unit, dest } => (unit, Some(dest)),
        Order::Destroy { unit } => (unit, None),
        _ => return Err(ValidationError::WrongKind(board.describe_order(order))),
    };
    check_provinces(board, order)?;
    let here = board.location_name(unit.location);
    let d = ledger.dislodged[unit.location.province.index()]
        .as_ref()
        .ok_or_else(|| ValidationError::NotDislodged(here.clone()))?;
    if d.unit.power != power {
        return Err(ValidationError::NotOwner(here));
    }
    if d.unit.unit_type != unit.unit_type {
        return Err(ValidationError::WrongUnitType(here));
    }
    if unit.location.coast != Coast::None && unit.location.coast != d.unit.coast {
        return Err(ValidationError::WrongCoast(here));
    }

    let province = unit.location.province;
    let Some(dest) = dest else {
        return Ok((province, RetreatChoice::Disband));
    };
    let candidates: Vec<Location> = d
        .retreats
        .iter()
        .copied()
        .filter(|l| l.province == dest.province && (dest.coast == Coast::None || l.coast == dest.coast))
        .collect();
    match candidates.as_slice() {
        [only] => Ok((province, RetreatChoice::Retreat(*only))),
        [] => Err(ValidationError::IllegalRetreat(board.location_name(dest))),
        _ => Err(ValidationError::AmbiguousCoast(board.location_name(dest))),
    }
}

/// Resolves retreat-phase orders against the dislodged units in `ledger`.
///
/// Rules:
/// - A unit retreats only to one of the destinations fixed at dislodgement.
/// - If two units retreat to the same province, both are disbanded.
/// - Destroy orders disband the unit voluntarily.
/// - Units with no valid order are disbanded.
pub fn resolve_retreats(board: &Board, ledger: &Ledger, orders: &[(Order, PowerId)]) -> RetreatResolution {
    let mut results = Vec::new();
    let mut choices: Vec<Option<RetreatChoice>> = vec![None; board.province_count()];

    for &(order, power) in orders {
        let checked = check_retreat_order(board, ledger, power, &order).and_then(|(p, c)| {
            match choices[p.index()] {
                Some(_) => Err(ValidationError::DuplicateOrder(board.abbr(p).to_string())),
                None => Ok((p, c)),
            }
        });
        match checked {
            Ok((p, c)) => choices[p.index()] = Some(c),
            Err(e) => {
                debug!(power = board.power_name(power), order = %board.describe_order(&order), error = %e, "retreat order rejected");
                results.push(TurnResult::new(board, power, order, OrderOutcome::Illegal, e.to_string()));
            }
        }
    }

    // Count retreats into each province to detect collisions.
    let mut arrivals = vec![0u8; board.province_count()];
    for choice in choices.iter().flatten() {
        if let RetreatChoice::Retreat(dest) = choice {
            arrivals[dest.province.index()] += 1;
        }
    }

    let mut next = ledger.clone();
    for d in ledger.dislodged_units() {
        let unit = d.unit;
        let me = OrderUnit { unit_type: unit.unit_type, location: unit.location() };
        let result = match choices[unit.province.index()] {
            Some(RetreatChoice::Retreat(dest)) => {
                let order = Order::Retreat { unit: me, dest };
                if arrivals[dest.province.index()] > 1 {
                    TurnResult::new(board, unit.power, order, OrderOutcome::Disbanded, "retreats collided")
                } else {
                    next.units[dest.province.index()] = Some(unit.moved_to(dest));
                    TurnResult::new(board, unit.power, order, OrderOutcome::Succeeded, "")
                }
            }
            Some(RetreatChoice::Disband) => TurnResult::new(
                board,
                unit.power,
                Order::Destroy { unit: me },
                OrderOutcome::Succeeded,
                "disbanded by order",
            ),
            None => {
                let reason = if d.retreats.is_empty() {
                    "no legal retreat"
                } else {
                    "no valid retreat ordered"
                };
                TurnResult::new(board, unit.power, Order::Destroy { unit: me }, OrderOutcome::Disbanded, reason)
            }
        };
        results.push(result);
    }
    next.clear_dislodged();
    sort_results(&mut results);

    debug!(retreats = ledger.dislodged_units().count(), "retreats resolved");
    RetreatResolution { ledger: next, results }
}
