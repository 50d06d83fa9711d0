//! Phase sequencing logic.
//!
//! Determines the next phase in the game year from the current season and
//! phase and whether the phase just resolved dislodged anything.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Phase, Season};

/// A point in the game calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameDate {
    pub year: u16,
    pub season: Season,
    pub phase: Phase,
}

impl GameDate {
    pub fn new(year: u16, season: Season, phase: Phase) -> Self {
        GameDate { year, season, phase }
    }

    /// Spring movement of `year`.
    pub fn opening(year: u16) -> Self {
        GameDate::new(year, Season::Spring, Phase::Movement)
    }

    /// Returns the date that follows this one.
    ///
    /// Phase flow:
    /// - Spring Movement -> Spring Retreat (if dislodged) OR Autumn Movement
    /// - Spring Retreat  -> Autumn Movement
    /// - Autumn Movement -> Autumn Retreat (if dislodged) OR Adjustment
    /// - Autumn Retreat  -> Adjustment
    /// - Adjustment      -> Spring Movement (next year)
    pub fn next(self, has_dislodgements: bool) -> GameDate {
        match self.phase {
            Phase::Movement if has_dislodgements => GameDate { phase: Phase::Retreat, ..self },
            Phase::Movement | Phase::Retreat => after_movement(self),
            Phase::Adjustment => GameDate::opening(self.year + 1),
        }
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.season, self.year, self.phase)
    }
}

fn after_movement(date: GameDate) -> GameDate {
    match date.season {
        Season::Spring => GameDate::new(date.year, Season::Autumn, Phase::Movement),
        Season::Autumn => GameDate::new(date.year, Season::Autumn, Phase::Adjustment),
    }
}
