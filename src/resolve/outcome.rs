//! Per-order results reported back to players.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Order, PowerId};

/// The outcome tag of a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderOutcome {
    Succeeded,
    Bounced,
    Cut,
    Dislodged,
    Disbanded,
    Illegal,
}

impl fmt::Display for OrderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderOutcome::Succeeded => "succeeded",
            OrderOutcome::Bounced => "bounced",
            OrderOutcome::Cut => "cut",
            OrderOutcome::Dislodged => "dislodged",
            OrderOutcome::Disbanded => "disbanded",
            OrderOutcome::Illegal => "illegal",
        })
    }
}

/// An order paired with its outcome and a human-readable reason.
///
/// Results are an audit trail only; resolvers never read them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub power: PowerId,
    pub order: Order,
    /// The order in compact notation, e.g. `A vie - bud`.
    pub description: String,
    pub outcome: OrderOutcome,
    pub reason: String,
}

impl TurnResult {
    pub fn new(
        board: &Board,
        power: PowerId,
        order: Order,
        outcome: OrderOutcome,
        reason: impl Into<String>,
    ) -> Self {
        TurnResult {
            power,
            description: board.describe_order(&order),
            order,
            outcome,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TurnResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reason.is_empty() {
            write!(f, "{}: {}", self.description, self.outcome)
        } else {
            write!(f, "{}: {} ({})", self.description, self.outcome, self.reason)
        }
    }
}

/// Sorts results into a canonical order: by power, then by description.
pub(crate) fn sort_results(results: &mut [TurnResult]) {
    results.sort_by(|a, b| {
        a.power
            .cmp(&b.power)
            .then_with(|| a.description.cmp(&b.description))
            .then_with(|| a.reason.cmp(&b.reason))
    });
}
