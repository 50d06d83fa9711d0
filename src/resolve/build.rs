//! Adjustment-phase resolution.
//!
//! Validates and applies build and destroy orders at the end of a game year.
//! Each power may build up to `controlled centers - units` units, or must
//! lose `units - controlled centers`. Missing removals are chosen by the
//! engine: units furthest from home go first.

use std::cmp::Reverse;

use tracing::{debug, info};

use crate::board::{Board, Coast, Ledger, Location, Order, OrderKind, OrderUnit, PowerId, ProvinceId, Unit, UnitType};
use crate::config::DisbandTieBreak;

use super::outcome::{sort_results, OrderOutcome, TurnResult};
use super::validate::{check_unit, ValidationError};

/// The outcome of an adjustment phase.
#[derive(Debug, Clone)]
pub struct AdjustmentResolution {
    pub ledger: Ledger,
    pub results: Vec<TurnResult>,
}

/// Returns `controlled centers - units` for a power.
pub fn adjustment_delta(ledger: &Ledger, power: PowerId) -> i64 {
    ledger.center_count(power) as i64 - ledger.unit_count(power) as i64
}

/// Returns true if any power has builds or removals due.
pub fn needs_adjustment(board: &Board, ledger: &Ledger) -> bool {
    board.power_ids().any(|p| adjustment_delta(ledger, p) != 0)
}

/// Resolves adjustment orders for all powers.
///
/// For each power:
/// - If centers > units: honors up to that many Build or Waive orders;
///   unused builds are forfeited.
/// - If units > centers: honors Destroy orders up to the required count and
///   removes further units by the removal ranking for any shortfall.
/// - Otherwise every order is rejected.
pub fn resolve_adjustment(
    board: &Board,
    ledger: &Ledger,
    orders: &[(Order, PowerId)],
    tie_break: DisbandTieBreak,
) -> AdjustmentResolution {
    let mut next = ledger.clone();
    let mut results = Vec::new();

    for power in board.power_ids() {
        let own: Vec<Order> = orders
            .iter()
            .filter(|(_, p)| *p == power)
            .map(|(o, _)| *o)
            .collect();
        let delta = adjustment_delta(ledger, power);

        if delta > 0 {
            resolve_builds(board, &mut next, power, delta as usize, &own, &mut results);
        } else if delta < 0 {
            resolve_removals(board, &mut next, power, delta.unsigned_abs() as usize, &own, tie_break, &mut results);
        } else {
            for order in own {
                let err = match order.kind() {
                    OrderKind::Destroy => ValidationError::NoRemovalsRequired,
                    _ => ValidationError::NoBuildsAvailable,
                };
                reject(board, power, order, err, &mut results);
            }
        }

        if delta != 0 {
            info!(
                power = board.power_name(power),
                delta,
                units = next.unit_count(power),
                centers = next.center_count(power),
                "adjustment applied"
            );
        }
    }

    sort_results(&mut results);
    AdjustmentResolution { ledger: next, results }
}

fn reject(board: &Board, power: PowerId, order: Order, err: ValidationError, results: &mut Vec<TurnResult>) {
    debug!(power = board.power_name(power), order = %board.describe_order(&order), error = %err, "adjustment order rejected");
    results.push(TurnResult::new(board, power, order, OrderOutcome::Illegal, err.to_string()));
}

/// Validates a build order, returning the unit to place.
fn check_build(board: &Board, ledger: &Ledger, power: PowerId, unit: OrderUnit) -> Result<Unit, ValidationError> {
    let loc = unit.location;
    let info = board
        .get_info(loc.province)
        .ok_or(ValidationError::UnknownProvince(loc.province.0))?;
    let name = board.location_name(loc);

    if !info.is_supply_center || info.home_power != Some(power) {
        return Err(ValidationError::NotHomeCenter(name));
    }
    if ledger.controller(loc.province) != Some(power) {
        return Err(ValidationError::NotControlled(name));
    }
    if ledger.unit_at(loc.province).is_some() {
        return Err(ValidationError::Occupied(name));
    }
    if !info.terrain.allows(unit.unit_type) {
        return Err(ValidationError::BadTerrain(name));
    }

    let coast = match unit.unit_type {
        UnitType::Army => Coast::None,
        UnitType::Fleet if info.has_coasts() => {
            if !info.coasts.contains(&loc.coast) {
                return Err(ValidationError::AmbiguousCoast(name));
            }
            loc.coast
        }
        UnitType::Fleet => Coast::None,
    };

    Ok(Unit { unit_type: unit.unit_type, power, province: loc.province, coast })
}

fn resolve_builds(
    board: &Board,
    ledger: &mut Ledger,
    power: PowerId,
    allowed: usize,
    orders: &[Order],
    results: &mut Vec<TurnResult>,
) {
    let mut used = 0;
    for &order in orders {
        match order {
            Order::Build { .. } | Order::Waive if used >= allowed => {
                reject(board, power, order, ValidationError::NoBuildsAvailable, results);
            }
            Order::Build { unit } => match check_build(board, ledger, power, unit) {
                Ok(built) => {
                    ledger.place_unit(built);
                    used += 1;
                    let order = Order::Build {
                        unit: OrderUnit { unit_type: built.unit_type, location: built.location() },
                    };
                    results.push(TurnResult::new(board, power, order, OrderOutcome::Succeeded, ""));
                }
                Err(e) => reject(board, power, order, e, results),
            },
            Order::Waive => {
                used += 1;
                results.push(TurnResult::new(board, power, order, OrderOutcome::Succeeded, "build waived"));
            }
            Order::Destroy { .. } => reject(board, power, order, ValidationError::NoRemovalsRequired, results),
            _ => reject(board, power, order, ValidationError::WrongKind(board.describe_order(&order)), results),
        }
    }
    if used < allowed {
        debug!(power = board.power_name(power), forfeited = allowed - used, "unused builds forfeited");
    }
}

/// Ranks units for removal: furthest from the nearest home center first
/// (unreachable counts as furthest), then by `tie_break`, then by province
/// abbreviation.
pub fn removal_order(board: &Board, power: PowerId, units: &[Unit], tie_break: DisbandTieBreak) -> Vec<Unit> {
    let dist = board.distances_from(&board.home_centers(power));
    let kind_rank = |u: &Unit| match (tie_break, u.unit_type) {
        (DisbandTieBreak::ProvinceOrder, _) => 0,
        (DisbandTieBreak::FleetsFirst, UnitType::Fleet) | (DisbandTieBreak::ArmiesFirst, UnitType::Army) => 0,
        _ => 1,
    };
    let mut ranked = units.to_vec();
    ranked.sort_by(|a, b| {
        let da = dist[a.province.index()].unwrap_or(u32::MAX);
        let db = dist[b.province.index()].unwrap_or(u32::MAX);
        Reverse(da)
            .cmp(&Reverse(db))
            .then_with(|| kind_rank(a).cmp(&kind_rank(b)))
            .then_with(|| board.abbr(a.province).cmp(board.abbr(b.province)))
    });
    ranked
}

fn resolve_removals(
    board: &Board,
    ledger: &mut Ledger,
    power: PowerId,
    needed: usize,
    orders: &[Order],
    tie_break: DisbandTieBreak,
    results: &mut Vec<TurnResult>,
) {
    let mut chosen: Vec<(Order, Unit)> = Vec::new();
    for &order in orders {
        let Order::Destroy { unit } = order else {
            let err = match order {
                Order::Build { .. } | Order::Waive => ValidationError::NoBuildsAvailable,
                _ => ValidationError::WrongKind(board.describe_order(&order)),
            };
            reject(board, power, order, err, results);
            continue;
        };
        match check_unit(board, ledger, power, unit) {
            Ok(u) if chosen.iter().any(|(_, c)| c.province == u.province) => {
                let err = ValidationError::DuplicateOrder(board.abbr(u.province).to_string());
                reject(board, power, order, err, results);
            }
            Ok(u) => chosen.push((order, u)),
            Err(e) => reject(board, power, order, e, results),
        }
    }

    // Too many removals ordered: keep the ones the ranking would pick.
    if chosen.len() > needed {
        let units: Vec<Unit> = chosen.iter().map(|(_, u)| *u).collect();
        let keep: Vec<ProvinceId> = removal_order(board, power, &units, tie_break)
            .into_iter()
            .take(needed)
            .map(|u| u.province)
            .collect();
        chosen.retain(|(order, u)| {
            let kept = keep.contains(&u.province);
            if !kept {
                reject(board, power, *order, ValidationError::NoRemovalsRequired, results);
            }
            kept
        });
    }

    for (order, unit) in &chosen {
        ledger.remove_unit(unit.province);
        results.push(TurnResult::new(board, power, *order, OrderOutcome::Succeeded, "unit removed"));
    }

    let shortfall = needed - chosen.len();
    if shortfall > 0 {
        let remaining = ledger.units_of(power);
        for unit in removal_order(board, power, &remaining, tie_break).into_iter().take(shortfall) {
            ledger.remove_unit(unit.province);
            let order = Order::Destroy {
                unit: OrderUnit {
                    unit_type: unit.unit_type,
                    location: Location::with_coast(unit.province, unit.coast),
                },
            };
            results.push(TurnResult::new(board, power, order, OrderOutcome::Disbanded, "forced removal"));
        }
    }
}
