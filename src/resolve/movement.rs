//! Movement-phase resolution: validation, adjudication and application.
//!
//! Produces a fresh ledger; the input ledger is never mutated, so a phase is
//! either committed whole by the caller or not at all.

use tracing::{debug, info};

use crate::board::{Board, DislodgedUnit, Ledger, Location, Order, PowerId, ProvinceId, Unit};

use super::kruijswijk::{resolve_orders, Dislodgement, OrderResult, ResolvedOrder};
use super::outcome::{sort_results, OrderOutcome, TurnResult};
use super::retreat::retreat_destinations;
use super::validate::validate_movement;

/// A supply center changing hands after a successful move-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlChange {
    pub province: ProvinceId,
    pub from: Option<PowerId>,
    pub to: PowerId,
}

/// The full outcome of one movement phase.
#[derive(Debug, Clone)]
pub struct MovementResolution {
    /// Occupancy, control and dislodged units after the phase.
    pub ledger: Ledger,
    pub control_changes: Vec<ControlChange>,
    pub results: Vec<TurnResult>,
}

impl MovementResolution {
    /// Returns true if any unit must retreat.
    pub fn has_dislodged(&self) -> bool {
        self.ledger.has_dislodged()
    }
}

/// Resolves one movement phase.
///
/// `orders` may come in any order and from any mix of powers; illegal
/// orders are reported and their units hold.
pub fn resolve_movement(board: &Board, ledger: &Ledger, orders: &[(Order, PowerId)]) -> MovementResolution {
    let (validated, mut results) = validate_movement(board, ledger, orders);
    let (resolved, dislodged) = resolve_orders(&validated, board);

    let mut next = ledger.clone();
    next.clear_dislodged();
    apply_resolution(&mut next, &resolved, &dislodged);

    let standoffs = standoff_provinces(board, &resolved, &dislodged);
    for d in &dislodged {
        let retreats = retreat_destinations(board, &next, d, &standoffs);
        next.set_dislodged(DislodgedUnit {
            unit: d.unit,
            attacker_from: d.attacker_from,
            retreats,
        });
    }

    let control_changes = update_control(board, &mut next, &resolved);

    results.extend(resolved.iter().map(|r| report(board, r, &dislodged)));
    sort_results(&mut results);

    debug!(
        orders = validated.len(),
        dislodged = dislodged.len(),
        control_changes = control_changes.len(),
        "movement resolved"
    );

    MovementResolution { ledger: next, control_changes, results }
}

/// Applies resolved movement orders to the ledger.
///
/// Every successful mover is lifted off the board before any is placed, so
/// rotations and swaps by convoy never overwrite each other. Dislodged
/// units are removed from the board; the caller records their retreats.
pub fn apply_resolution(ledger: &mut Ledger, resolved: &[ResolvedOrder], dislodged: &[Dislodgement]) {
    let mut movers: Vec<(Unit, Location)> = Vec::new();
    for r in resolved {
        if let (Order::Move { unit, dest, .. }, OrderResult::Succeeded) = (r.order, r.result) {
            if let Some(u) = ledger.remove_unit(unit.location.province) {
                movers.push((u, dest));
            }
        }
    }

    for d in dislodged {
        ledger.remove_unit(d.unit.province);
    }

    for (unit, dest) in movers {
        ledger.units[dest.province.index()] = Some(unit.moved_to(dest));
    }
}

/// Provinces left empty by a standoff: the target of a failed move with
/// no successful move in. Moves that lacked a convoy path do not count,
/// nor does a unit that lost a head-to-head battle against the province it
/// attacked.
fn standoff_provinces(board: &Board, resolved: &[ResolvedOrder], dislodged: &[Dislodgement]) -> Vec<bool> {
    let mut bounced = vec![false; board.province_count()];
    let mut entered = vec![false; board.province_count()];
    for r in resolved {
        if let Order::Move { unit, dest, via_convoy } = r.order {
            let (from, to) = (unit.location.province, dest.province);
            match r.result {
                OrderResult::Succeeded => entered[to.index()] = true,
                OrderResult::Bounced if !lost_head_to_head(r, from, to, via_convoy, dislodged) => {
                    bounced[to.index()] = true
                }
                _ => {}
            }
        }
    }
    bounced
        .iter()
        .zip(&entered)
        .map(|(b, e)| *b && !*e)
        .collect()
}

fn lost_head_to_head(
    r: &ResolvedOrder,
    from: ProvinceId,
    dest: ProvinceId,
    via_convoy: bool,
    dislodged: &[Dislodgement],
) -> bool {
    r.dislodged
        && !via_convoy
        && dislodged
            .iter()
            .any(|d| d.unit.province == from && d.attacker_from == dest && !d.by_convoy)
}

/// Transfers control of every supply center entered by a foreign unit.
fn update_control(board: &Board, ledger: &mut Ledger, resolved: &[ResolvedOrder]) -> Vec<ControlChange> {
    let mut changes = Vec::new();
    for r in resolved {
        let (Order::Move { dest, .. }, OrderResult::Succeeded) = (r.order, r.result) else {
            continue;
        };
        let province = dest.province;
        if !board.info(province).is_supply_center {
            continue;
        }
        let from = ledger.controller(province);
        if from == Some(r.power) {
            continue;
        }
        ledger.set_controller(province, Some(r.power));
        info!(
            province = board.abbr(province),
            from = from.map(|p| board.power_name(p)),
            to = board.power_name(r.power),
            "supply center changed hands"
        );
        changes.push(ControlChange { province, from, to: r.power });
    }
    changes
}

fn report(board: &Board, r: &ResolvedOrder, dislodged: &[Dislodgement]) -> TurnResult {
    let (outcome, reason) = if r.dislodged {
        let from = r
            .order
            .province()
            .and_then(|p| dislodged.iter().find(|d| d.unit.province == p))
            .map(|d| board.abbr(d.attacker_from).to_string())
            .unwrap_or_default();
        (OrderOutcome::Dislodged, format!("dislodged by attack from {from}"))
    } else {
        match r.result {
            OrderResult::Succeeded => (OrderOutcome::Succeeded, String::new()),
            OrderResult::Bounced => (OrderOutcome::Bounced, "insufficient strength".to_string()),
            OrderResult::NoConvoyPath => (OrderOutcome::Bounced, "no convoy path".to_string()),
            OrderResult::Cut => (OrderOutcome::Cut, "support cut".to_string()),
            OrderResult::Void => (
                OrderOutcome::Illegal,
                "target unit was not ordered accordingly".to_string(),
            ),
            OrderResult::Disrupted => (OrderOutcome::Bounced, "convoying fleet dislodged".to_string()),
        }
    };
    TurnResult::new(board, r.power, r.order, outcome, reason)
}
