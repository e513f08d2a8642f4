//! Capacity classifier: labels a failed game by who showed up.
//!
//! Total over every `(capacity, participants)` pair. Anything outside the
//! recognised capacities, or a negative participant count, is
//! `UNKNOWN`/`SUSPICIOUS` rather than an error.

use mmtrace_core::{CapacityStatus, GameSize};
use serde::Serialize;

/// Minimum participants for a 6-player table to start.
pub const SIX_PLAYER_PLAYABLE_MIN: i64 = 3;

const INTEGRITY_BUG: &str = "more players than capacity — integrity bug";
const UNRECOGNIZED_CAPACITY: &str = "unrecognized capacity value";

/// Verdict for one failed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityClassification {
    pub capacity: Option<i64>,
    pub participant_count: i64,
    pub game_size: GameSize,
    pub status: CapacityStatus,
    pub rationale: &'static str,
}

/// Classify a failed game from its capacity and distinct participant count.
pub fn classify_capacity(capacity: Option<i64>, participant_count: i64) -> CapacityClassification {
    let (game_size, status, rationale) = match (capacity, participant_count) {
        (_, p) if p < 0 => (GameSize::Unknown, CapacityStatus::Suspicious, "invalid participant count"),
        (Some(2), 1) => (GameSize::TwoPlayer, CapacityStatus::Normal, "insufficient players, expected timeout"),
        (Some(2), 2) => (GameSize::TwoPlayer, CapacityStatus::Fishy, "both players present but failed"),
        (Some(2), 0) => (GameSize::TwoPlayer, CapacityStatus::Suspicious, "no participants recorded"),
        (Some(2), _) => (GameSize::TwoPlayer, CapacityStatus::Suspicious, INTEGRITY_BUG),
        (Some(6), p) if p < SIX_PLAYER_PLAYABLE_MIN => (
            GameSize::SixPlayer,
            CapacityStatus::Normal,
            "insufficient players, below playable minimum of 3",
        ),
        (Some(6), p) if p <= 6 => (GameSize::SixPlayer, CapacityStatus::Fishy, "sufficient players but failed"),
        (Some(6), _) => (GameSize::SixPlayer, CapacityStatus::Suspicious, INTEGRITY_BUG),
        _ => (GameSize::Unknown, CapacityStatus::Suspicious, UNRECOGNIZED_CAPACITY),
    };
    CapacityClassification {
        capacity,
        participant_count,
        game_size,
        status,
        rationale,
    }
}

/// Parse a capacity cell. Accepts integers and integral floats (`"6.0"`);
/// anything else is `None`.
pub fn parse_capacity(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

/// Game size for a capacity, without a participant count.
pub fn game_size(capacity: Option<i64>) -> GameSize {
    match capacity {
        Some(2) => GameSize::TwoPlayer,
        Some(6) => GameSize::SixPlayer,
        _ => GameSize::Unknown,
    }
}
