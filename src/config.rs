//! Rules configuration for a game.
//!
//! Loaded from JSON; every field is optional and falls back to the
//! variant's defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Board;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("win threshold must be positive")]
    InvalidThreshold,
}

/// How forced removals are ordered among units equally far from home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisbandTieBreak {
    /// Province abbreviation, ascending.
    #[default]
    ProvinceOrder,
    /// Fleets are removed before armies.
    FleetsFirst,
    /// Armies are removed before fleets.
    ArmiesFirst,
}

/// Per-game rule overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Centers needed for a solo win; the variant's threshold when unset.
    pub win_threshold: Option<usize>,
    pub disband_tie_break: DisbandTieBreak,
}

impl RulesConfig {
    /// Parses a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.win_threshold == Some(0) {
            return Err(ConfigError::InvalidThreshold);
        }
        Ok(())
    }

    /// Returns the threshold in force for `board`.
    pub fn win_threshold(&self, board: &Board) -> usize {
        self.win_threshold.unwrap_or_else(|| board.win_threshold())
    }
}
