//! Game state and turn processing.
//!
//! A [`GameState`] is a plain owned value: [`process_turn`] takes one by
//! reference and returns the next, so concurrent games need no locking and
//! a failed call leaves the caller's state untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::board::{load_variant, Board, Ledger, Order, OrderKind, Phase, PowerId, VariantError};
use crate::config::{ConfigError, RulesConfig};
use crate::resolve::{
    evaluate, resolve_adjustment, resolve_movement, resolve_retreats, GameDate, GameOutcome, TurnResult,
};

/// Orders for one phase, keyed by power name.
pub type OrderSet = BTreeMap<String, Vec<Order>>;

/// A turn rejected before resolution began.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("game is already over")]
    GameOver,

    #[error("unknown power: {0}")]
    UnknownPower(String),

    #[error("{0} has been eliminated")]
    PowerEliminated(String),

    #[error("{kind} orders are not accepted in the {phase} phase")]
    WrongPhase { kind: OrderKind, phase: Phase },
}

/// One committed phase in a game's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub date: GameDate,
    pub orders: OrderSet,
    pub results: Vec<TurnResult>,
}

/// Everything needed to resume a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Arc<Board>,
    pub rules: RulesConfig,
    /// Number of phases committed so far.
    pub turn: u32,
    pub date: GameDate,
    pub ledger: Ledger,
    pub history: Vec<PhaseRecord>,
    pub outcome: Option<GameOutcome>,
}

impl GameState {
    /// Starts a game at the variant's opening position.
    pub fn new(board: Arc<Board>, rules: RulesConfig) -> Result<Self, ConfigError> {
        rules.validate()?;
        Ok(Self::start(board, rules))
    }

    /// Starts a game on a built-in variant with default rules.
    pub fn from_variant(name: &str) -> Result<Self, VariantError> {
        let board = Arc::new(load_variant(name)?);
        Ok(Self::start(board, RulesConfig::default()))
    }

    /// Builds the opening state. `rules` must already be valid.
    fn start(board: Arc<Board>, rules: RulesConfig) -> Self {
        let mut ledger = Ledger::initial(&board);
        let (_, outcome) = evaluate(&board, &mut ledger, rules.win_threshold(&board));
        GameState {
            date: GameDate::opening(board.start_year()),
            board,
            rules,
            turn: 0,
            ledger,
            history: Vec::new(),
            outcome,
        }
    }

    pub fn phase(&self) -> Phase {
        self.date.phase
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns the names of powers still in the game.
    pub fn alive_powers(&self) -> Vec<&str> {
        self.board
            .power_ids()
            .filter(|&p| self.ledger.is_alive(p))
            .map(|p| self.board.power_name(p))
            .collect()
    }

    /// Checks an order set against the current phase and flattens it.
    fn collect_orders(&self, orders: &OrderSet) -> Result<Vec<(Order, PowerId)>, StateError> {
        let phase = self.date.phase;
        let mut flat = Vec::new();
        for (name, list) in orders {
            let power = self
                .board
                .power(name)
                .ok_or_else(|| StateError::UnknownPower(name.clone()))?;
            if !self.ledger.is_alive(power) && !list.is_empty() {
                return Err(StateError::PowerEliminated(name.clone()));
            }
            for order in list {
                let kind = order.kind();
                if !kind.allowed_in(phase) {
                    return Err(StateError::WrongPhase { kind, phase });
                }
                flat.push((*order, power));
            }
        }
        Ok(flat)
    }
}

/// Resolves the current phase and returns the next state with this phase's
/// results.
///
/// Missing orders are not an error: unordered units hold, undecided
/// retreats disband and unused builds are forfeited. The whole order set is
/// rejected if any order is of the wrong kind for the phase.
pub fn process_turn(state: &GameState, orders: &OrderSet) -> Result<(GameState, Vec<TurnResult>), StateError> {
    if state.is_over() {
        return Err(StateError::GameOver);
    }
    let flat = state.collect_orders(orders)?;
    let board = &state.board;

    let mut next = state.clone();
    let mut dislodged = false;
    let results = match state.date.phase {
        Phase::Movement => {
            let res = resolve_movement(board, &state.ledger, &flat);
            dislodged = res.has_dislodged();
            next.ledger = res.ledger;
            res.results
        }
        Phase::Retreat => {
            let res = resolve_retreats(board, &state.ledger, &flat);
            next.ledger = res.ledger;
            res.results
        }
        Phase::Adjustment => {
            let res = resolve_adjustment(board, &state.ledger, &flat, state.rules.disband_tie_break);
            next.ledger = res.ledger;
            let threshold = state.rules.win_threshold(board);
            let (_, outcome) = evaluate(board, &mut next.ledger, threshold);
            next.outcome = outcome;
            res.results
        }
    };

    next.history.push(PhaseRecord {
        date: state.date,
        orders: orders.clone(),
        results: results.clone(),
    });
    next.turn += 1;
    next.date = state.date.next(dislodged);

    debug!(orders = flat.len(), results = results.len(), "phase resolved");
    info!(turn = next.turn, from = %state.date, to = %next.date, "phase advanced");

    Ok((next, results))
}

/// Processes one turn for each of many independent games on the rayon pool.
///
/// Results come back in input order.
pub fn process_turns_parallel(
    games: &[(GameState, OrderSet)],
) -> Vec<Result<(GameState, Vec<TurnResult>), StateError>> {
    games
        .par_iter()
        .map(|(state, orders)| process_turn(state, orders))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{OrderUnit, ProvinceId, Season};
    use crate::resolve::OrderOutcome;

    fn hold(state: &GameState, at: &str) -> Order {
        Order::Hold {
            unit: OrderUnit::army(state.board.province(at).unwrap()),
        }
    }

    #[test]
    fn new_game_starts_in_spring() {
        let state = GameState::from_variant("standard").unwrap();
        assert_eq!(state.date, GameDate::opening(1901));
        assert_eq!(state.turn, 0);
        assert_eq!(state.alive_powers().len(), 7);
        assert!(!state.is_over());
    }

    #[test]
    fn unknown_variant_rejected() {
        assert!(matches!(
            GameState::from_variant("nonexistent"),
            Err(VariantError::UnknownVariant(_))
        ));
    }

    #[test]
    fn both_constructors_agree() {
        let board = Arc::new(load_variant("standard").unwrap());
        let built = GameState::new(board, RulesConfig::default()).unwrap();
        assert_eq!(GameState::from_variant("standard").unwrap(), built);
    }

    #[test]
    fn invalid_rules_rejected() {
        let board = Arc::new(load_variant("standard").unwrap());
        let rules = RulesConfig { win_threshold: Some(0), ..Default::default() };
        assert!(matches!(GameState::new(board, rules), Err(ConfigError::InvalidThreshold)));
    }

    #[test]
    fn empty_orders_advance_the_calendar() {
        let state = GameState::from_variant("standard").unwrap();
        let (state, results) = process_turn(&state, &OrderSet::new()).unwrap();
        assert_eq!(results.len(), 22);
        assert_eq!(state.date, GameDate::new(1901, Season::Autumn, Phase::Movement));
        assert_eq!(state.turn, 1);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].date, GameDate::opening(1901));
    }

    #[test]
    fn wrong_phase_order_rejected() {
        let state = GameState::from_variant("standard").unwrap();
        let mut orders = OrderSet::new();
        orders.insert("austria".to_string(), vec![Order::Waive]);
        let err = process_turn(&state, &orders).unwrap_err();
        assert_eq!(err, StateError::WrongPhase { kind: OrderKind::Waive, phase: Phase::Movement });
        assert_eq!(err.to_string(), "waive orders are not accepted in the movement phase");
    }

    #[test]
    fn off_board_province_is_an_illegal_order() {
        let state = GameState::from_variant("standard").unwrap();
        let stray = Order::Hold { unit: OrderUnit::army(ProvinceId(500)) };
        let mut orders = OrderSet::new();
        orders.insert("austria".to_string(), vec![stray]);
        let (next, results) = process_turn(&state, &orders).unwrap();
        assert_eq!(results.len(), 23);
        let illegal: Vec<&TurnResult> = results.iter().filter(|r| r.outcome == OrderOutcome::Illegal).collect();
        assert_eq!(illegal.len(), 1);
        assert_eq!(illegal[0].order, stray);
        assert_eq!(next.ledger.all_units().count(), 22);
    }

    #[test]
    fn unknown_power_rejected() {
        let state = GameState::from_variant("standard").unwrap();
        let mut orders = OrderSet::new();
        orders.insert("atlantis".to_string(), vec![hold(&state, "vie")]);
        assert_eq!(
            process_turn(&state, &orders).unwrap_err(),
            StateError::UnknownPower("atlantis".to_string())
        );
    }

    #[test]
    fn eliminated_power_cannot_order() {
        let mut state = GameState::from_variant("standard").unwrap();
        let italy = state.board.power("italy").unwrap();
        state.ledger.alive[italy.index()] = false;
        let mut orders = OrderSet::new();
        orders.insert("italy".to_string(), vec![hold(&state, "ven")]);
        assert_eq!(
            process_turn(&state, &orders).unwrap_err(),
            StateError::PowerEliminated("italy".to_string())
        );
    }

    #[test]
    fn finished_game_rejects_turns() {
        let mut state = GameState::from_variant("standard").unwrap();
        state.outcome = Some(GameOutcome::Draw(Vec::new()));
        assert_eq!(process_turn(&state, &OrderSet::new()).unwrap_err(), StateError::GameOver);
    }

    #[test]
    fn state_survives_json() {
        let state = GameState::from_variant("standard").unwrap();
        let (state, _) = process_turn(&state, &OrderSet::new()).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn parallel_matches_sequential() {
        let state = GameState::from_variant("standard").unwrap();
        let games: Vec<(GameState, OrderSet)> = (0..4).map(|_| (state.clone(), OrderSet::new())).collect();
        let expected = process_turn(&state, &OrderSet::new()).unwrap();
        for result in process_turns_parallel(&games) {
            assert_eq!(result.unwrap(), expected);
        }
    }
}
