//! Elimination and victory evaluation.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::{Board, Ledger, PowerId};

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "powers", rename_all = "snake_case")]
pub enum GameOutcome {
    /// One power reached the win threshold alone.
    Solo(PowerId),
    /// Several powers reached the threshold together, or none survived.
    Draw(Vec<PowerId>),
    /// Every other power was eliminated.
    LastStanding(PowerId),
}

/// Marks powers without supply centers as eliminated and removes their
/// units, then checks for a finished game.
///
/// Returns the powers eliminated by this call and the outcome, if any.
pub fn evaluate(board: &Board, ledger: &mut Ledger, win_threshold: usize) -> (Vec<PowerId>, Option<GameOutcome>) {
    let mut eliminated = Vec::new();
    for power in board.power_ids() {
        if !ledger.is_alive(power) || ledger.center_count(power) > 0 {
            continue;
        }
        ledger.alive[power.index()] = false;
        let units = ledger.units_of(power);
        for unit in &units {
            ledger.remove_unit(unit.province);
        }
        info!(power = board.power_name(power), destroyed = units.len(), "power eliminated");
        eliminated.push(power);
    }

    let winners: Vec<PowerId> = board
        .power_ids()
        .filter(|&p| ledger.is_alive(p) && ledger.center_count(p) >= win_threshold)
        .collect();

    let outcome = match winners.as_slice() {
        [solo] => Some(GameOutcome::Solo(*solo)),
        [] => match ledger.alive_count() {
            0 => Some(GameOutcome::Draw(Vec::new())),
            1 => board.power_ids().find(|&p| ledger.is_alive(p)).map(GameOutcome::LastStanding),
            _ => None,
        },
        _ => Some(GameOutcome::Draw(winners)),
    };

    if let Some(outcome) = &outcome {
        info!(?outcome, "game over");
    }
    (eliminated, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::load_variant;

    fn give(board: &Board, ledger: &mut Ledger, power: PowerId, count: usize) {
        let free: Vec<_> = board
            .supply_centers()
            .filter(|&p| ledger.controller(p).is_none())
            .take(count)
            .collect();
        for p in free {
            ledger.set_controller(p, Some(power));
        }
    }

    #[test]
    fn opening_position_is_ongoing() {
        let board = load_variant("standard").unwrap();
        let mut ledger = Ledger::initial(&board);
        let (eliminated, outcome) = evaluate(&board, &mut ledger, 18);
        assert!(eliminated.is_empty());
        assert!(outcome.is_none());
    }

    #[test]
    fn power_without_centers_is_eliminated() {
        let board = load_variant("standard").unwrap();
        let mut ledger = Ledger::initial(&board);
        let italy = board.power("italy").unwrap();
        for p in ledger.controlled_centers(italy) {
            ledger.set_controller(p, None);
        }
        let (eliminated, outcome) = evaluate(&board, &mut ledger, 18);
        assert_eq!(eliminated, vec![italy]);
        assert!(outcome.is_none());
        assert!(!ledger.is_alive(italy));
        assert_eq!(ledger.unit_count(italy), 0);

        // Already eliminated powers are not reported again.
        let (eliminated, _) = evaluate(&board, &mut ledger, 18);
        assert!(eliminated.is_empty());
    }

    #[test]
    fn threshold_gives_solo() {
        let board = load_variant("standard").unwrap();
        let mut ledger = Ledger::initial(&board);
        let france = board.power("france").unwrap();
        give(&board, &mut ledger, france, 12);
        assert_eq!(ledger.center_count(france), 15);
        let (_, outcome) = evaluate(&board, &mut ledger, 15);
        assert_eq!(outcome, Some(GameOutcome::Solo(france)));
    }

    #[test]
    fn simultaneous_threshold_is_a_draw() {
        let board = load_variant("standard").unwrap();
        let mut ledger = Ledger::initial(&board);
        let france = board.power("france").unwrap();
        let turkey = board.power("turkey").unwrap();
        give(&board, &mut ledger, france, 3);
        give(&board, &mut ledger, turkey, 3);
        let (_, outcome) = evaluate(&board, &mut ledger, 6);
        assert_eq!(outcome, Some(GameOutcome::Draw(vec![france, turkey])));
    }

    #[test]
    fn last_power_standing() {
        let board = load_variant("standard").unwrap();
        let mut ledger = Ledger::initial(&board);
        let russia = board.power("russia").unwrap();
        for p in board.supply_centers() {
            if ledger.controller(p) != Some(russia) {
                ledger.set_controller(p, None);
            }
        }
        let (eliminated, outcome) = evaluate(&board, &mut ledger, 18);
        assert_eq!(eliminated.len(), 6);
        assert_eq!(outcome, Some(GameOutcome::LastStanding(russia)));
    }
}
