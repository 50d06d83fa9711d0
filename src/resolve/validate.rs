//! Movement-phase order validation.
//!
//! Checks each submitted order against the board and ledger before
//! adjudication. Rejected orders become `Illegal` results and their unit
//! falls back to Hold; unordered units hold as well. Nothing here aborts a
//! phase.

use thiserror::Error;
use tracing::debug;

use crate::board::{
    Board, Coast, Ledger, Location, Order, OrderUnit, PowerId, ProvinceId, Terrain, Unit, UnitType,
};

use super::outcome::{OrderOutcome, TurnResult};

/// Why an order was rejected before resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no unit at {0}")]
    NoUnit(String),

    #[error("unit at {0} belongs to another power")]
    NotOwner(String),

    #[error("unit at {0} is not of the ordered type")]
    WrongUnitType(String),

    #[error("unit at {0} is not on the ordered coast")]
    WrongCoast(String),

    #[error("unknown province id {0}")]
    UnknownProvince(u16),

    #[error("unit at {0} already has an order")]
    DuplicateOrder(String),

    #[error("{from} is not adjacent to {to}")]
    NotAdjacent { from: String, to: String },

    #[error("fleet move to {0} needs a coast")]
    AmbiguousCoast(String),

    #[error("{0} cannot be entered by this unit")]
    BadTerrain(String),

    #[error("only armies between coastal provinces may be convoyed")]
    BadConvoyRoute,

    #[error("only fleets at sea may convoy")]
    NotAtSea,

    #[error("a unit cannot support or convoy itself")]
    SelfReference,

    #[error("{0} is not a valid order in this phase")]
    WrongKind(String),

    #[error("{0} is not a legal retreat")]
    IllegalRetreat(String),

    #[error("no dislodged unit at {0}")]
    NotDislodged(String),

    #[error("{0} is not a home center")]
    NotHomeCenter(String),

    #[error("{0} is not controlled by the building power")]
    NotControlled(String),

    #[error("{0} is occupied")]
    Occupied(String),

    #[error("no builds available")]
    NoBuildsAvailable,

    #[error("no removals required")]
    NoRemovalsRequired,
}

/// Rejects an order that names a province not on this board. Runs before
/// any per-province lookup.
pub fn check_provinces(board: &Board, order: &Order) -> Result<(), ValidationError> {
    match order.locations().into_iter().find(|l| !board.contains(l.province)) {
        Some(l) => Err(ValidationError::UnknownProvince(l.province.0)),
        None => Ok(()),
    }
}

/// Finds the ordered unit and checks ownership and type. Returns the
/// unit as it stands on the board.
pub fn check_unit(
    board: &Board,
    ledger: &Ledger,
    power: PowerId,
    unit: OrderUnit,
) -> Result<Unit, ValidationError> {
    if !board.contains(unit.location.province) {
        return Err(ValidationError::UnknownProvince(unit.location.province.0));
    }
    let here = || board.location_name(unit.location);
    let actual = ledger
        .unit_at(unit.location.province)
        .ok_or_else(|| ValidationError::NoUnit(here()))?;
    if actual.power != power {
        return Err(ValidationError::NotOwner(here()));
    }
    if actual.unit_type != unit.unit_type {
        return Err(ValidationError::WrongUnitType(here()));
    }
    if unit.location.coast != Coast::None && unit.location.coast != actual.coast {
        return Err(ValidationError::WrongCoast(here()));
    }
    Ok(actual)
}

/// Returns true if `unit` could move into `province` by itself.
pub fn can_reach(board: &Board, unit: &Unit, province: ProvinceId) -> bool {
    match unit.unit_type {
        UnitType::Army => board
            .adjacency()
            .is_adjacent(unit.province, Coast::None, province, Coast::None, false),
        UnitType::Fleet => !board
            .adjacency()
            .fleet_coasts_to(unit.province, unit.coast, province)
            .is_empty(),
    }
}

/// Resolves the destination of a direct move, inferring a fleet's coast
/// when only one is reachable.
pub fn move_destination(board: &Board, unit: &Unit, dest: Location) -> Result<Location, ValidationError> {
    let info = board.info(dest.province);
    let not_adjacent = || ValidationError::NotAdjacent {
        from: board.location_name(unit.location()),
        to: board.location_name(dest),
    };
    if !info.terrain.allows(unit.unit_type) {
        return Err(ValidationError::BadTerrain(board.location_name(dest)));
    }
    match unit.unit_type {
        UnitType::Army => {
            if !can_reach(board, unit, dest.province) {
                return Err(not_adjacent());
            }
            Ok(Location::new(dest.province))
        }
        UnitType::Fleet => {
            let coasts = board
                .adjacency()
                .fleet_coasts_to(unit.province, unit.coast, dest.province);
            if dest.coast != Coast::None {
                return if coasts.contains(&dest.coast) {
                    Ok(dest)
                } else {
                    Err(not_adjacent())
                };
            }
            match coasts.as_slice() {
                [] => Err(not_adjacent()),
                [only] => Ok(Location::with_coast(dest.province, *only)),
                _ => Err(ValidationError::AmbiguousCoast(board.location_name(dest))),
            }
        }
    }
}

/// Validates a single movement-phase order, returning it normalized to the
/// unit's actual location and any inferred coast.
pub fn check_movement_order(
    board: &Board,
    ledger: &Ledger,
    power: PowerId,
    order: &Order,
) -> Result<Order, ValidationError> {
    let Some(ordered) = order.unit() else {
        return Err(ValidationError::WrongKind(board.describe_order(order)));
    };
    check_provinces(board, order)?;
    let unit = check_unit(board, ledger, power, ordered)?;
    let me = OrderUnit { unit_type: unit.unit_type, location: unit.location() };

    match *order {
        Order::Hold { .. } => Ok(Order::Hold { unit: me }),

        Order::Move { dest, via_convoy, .. } => {
            if dest.province == unit.province {
                return Err(ValidationError::SelfReference);
            }
            if via_convoy {
                let coastal = |p| board.info(p).terrain == Terrain::Coast;
                if unit.unit_type != UnitType::Army || !coastal(unit.province) || !coastal(dest.province) {
                    return Err(ValidationError::BadConvoyRoute);
                }
                return Ok(Order::Move { unit: me, dest: Location::new(dest.province), via_convoy: true });
            }
            let dest = move_destination(board, &unit, dest)?;
            Ok(Order::Move { unit: me, dest, via_convoy: false })
        }

        Order::SupportHold { supported, .. } => {
            let target = supported.location.province;
            if target == unit.province {
                return Err(ValidationError::SelfReference);
            }
            if !can_reach(board, &unit, target) {
                return Err(ValidationError::NotAdjacent {
                    from: board.location_name(unit.location()),
                    to: board.abbr(target).to_string(),
                });
            }
            Ok(Order::SupportHold { unit: me, supported: strip_coast(supported) })
        }

        Order::SupportMove { supported, dest, .. } => {
            if supported.location.province == unit.province || dest.province == unit.province {
                return Err(ValidationError::SelfReference);
            }
            if !can_reach(board, &unit, dest.province) {
                return Err(ValidationError::NotAdjacent {
                    from: board.location_name(unit.location()),
                    to: board.abbr(dest.province).to_string(),
                });
            }
            Ok(Order::SupportMove {
                unit: me,
                supported: strip_coast(supported),
                dest: Location::new(dest.province),
            })
        }

        Order::Convoy { convoyed_from, convoyed_to, .. } => {
            if unit.unit_type != UnitType::Fleet || board.info(unit.province).terrain != Terrain::Sea {
                return Err(ValidationError::NotAtSea);
            }
            let coastal = |p| board.info(p).terrain == Terrain::Coast;
            if convoyed_from.province == convoyed_to.province
                || !coastal(convoyed_from.province)
                || !coastal(convoyed_to.province)
            {
                return Err(ValidationError::BadConvoyRoute);
            }
            Ok(Order::Convoy {
                unit: me,
                convoyed_from: Location::new(convoyed_from.province),
                convoyed_to: Location::new(convoyed_to.province),
            })
        }

        Order::Retreat { .. } | Order::Destroy { .. } | Order::Build { .. } | Order::Waive => {
            Err(ValidationError::WrongKind(board.describe_order(order)))
        }
    }
}

fn strip_coast(unit: OrderUnit) -> OrderUnit {
    OrderUnit { unit_type: unit.unit_type, location: Location::new(unit.location.province) }
}

/// Validates every submitted order, rejecting duplicates and defaulting
/// every unordered unit to Hold.
///
/// Returns one order per unit on the board, sorted by province, plus an
/// `Illegal` result for each rejected submission.
pub fn validate_movement(
    board: &Board,
    ledger: &Ledger,
    submitted: &[(Order, PowerId)],
) -> (Vec<(Order, PowerId)>, Vec<TurnResult>) {
    let mut accepted: Vec<Option<(Order, PowerId)>> = vec![None; board.province_count()];
    let mut rejected = Vec::new();

    for &(order, power) in submitted {
        let checked = check_movement_order(board, ledger, power, &order).and_then(|o| {
            let unit = o.unit().map(|u| u.location).ok_or(ValidationError::SelfReference)?;
            match accepted[unit.province.index()] {
                Some(_) => Err(ValidationError::DuplicateOrder(board.location_name(unit))),
                None => Ok((unit.province, o)),
            }
        });
        match checked {
            Ok((p, o)) => accepted[p.index()] = Some((o, power)),
            Err(e) => {
                debug!(power = board.power_name(power), order = %board.describe_order(&order), error = %e, "order rejected");
                rejected.push(TurnResult::new(board, power, order, OrderOutcome::Illegal, e.to_string()));
            }
        }
    }

    let orders = board
        .province_ids()
        .filter_map(|p| {
            let unit = ledger.unit_at(p)?;
            Some(accepted[p.index()].unwrap_or_else(|| {
                let me = OrderUnit { unit_type: unit.unit_type, location: unit.location() };
                (Order::Hold { unit: me }, unit.power)
            }))
        })
        .collect();

    (orders, rejected)
}
