//! Game-size labels and capacity verdicts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Game size derived from a table's configured capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameSize {
    #[serde(rename = "2-PLAYER")]
    TwoPlayer,
    #[serde(rename = "6-PLAYER")]
    SixPlayer,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl GameSize {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TwoPlayer => "2-PLAYER",
            Self::SixPlayer => "6-PLAYER",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for GameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How alarming a failed game is, given who showed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityStatus {
    /// Too few players to start; the failure is expected.
    Normal,
    /// Enough players to start, yet the game failed.
    Fishy,
    /// More players than seats, or an unrecognised capacity.
    Suspicious,
}

impl CapacityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Fishy => "FISHY",
            Self::Suspicious => "SUSPICIOUS",
        }
    }
}

impl fmt::Display for CapacityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
