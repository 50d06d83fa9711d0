//! Adjudicator library.
//!
//! Resolves simultaneous-order turns for Diplomacy-style map games: the
//! board model, per-phase resolvers and the turn state machine that
//! sequences them.

pub mod board;
pub mod config;
pub mod game;
pub mod resolve;

pub use board::{load_variant, Board, Order, OrderUnit};
pub use config::{DisbandTieBreak, RulesConfig};
pub use game::{process_turn, process_turns_parallel, GameState, OrderSet, StateError};
pub use resolve::{GameOutcome, OrderOutcome, TurnResult};
