//! Order resolution.
//!
//! Validates each phase's orders and resolves them into a new ledger plus
//! per-order results. Movement uses the Kruijswijk guess-and-check
//! algorithm; retreats and adjustments are direct.

pub mod build;
pub mod kruijswijk;
pub mod movement;
pub mod outcome;
pub mod phase;
pub mod retreat;
pub mod validate;
pub mod victory;

pub use build::{adjustment_delta, needs_adjustment, removal_order, resolve_adjustment, AdjustmentResolution};
pub use kruijswijk::{resolve_orders, Dislodgement, OrderResult, ResolvedOrder, Resolver};
pub use movement::{apply_resolution, resolve_movement, ControlChange, MovementResolution};
pub use outcome::{OrderOutcome, TurnResult};
pub use phase::GameDate;
pub use retreat::{resolve_retreats, retreat_destinations, RetreatResolution};
pub use validate::{check_movement_order, check_provinces, validate_movement, ValidationError};
pub use victory::{evaluate, GameOutcome};
