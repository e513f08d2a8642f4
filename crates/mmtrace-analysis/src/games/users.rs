//! Users ranked by failure rows.

use mmtrace_core::GameSize;
use serde::Serialize;

use super::row::{sizes_by_game, FailedGame, TableRow};
use crate::aggregation::{percentage, FrequencyTable};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserFailures {
    pub user_id: String,
    pub failures: usize,
    /// Share of all failure rows.
    pub percentage: f64,
    /// Sizes of the games the user failed in, sorted.
    pub game_sizes: Vec<GameSize>,
}

/// The `n` users with the most failure rows. Ties keep first-seen order.
pub fn top_failing_users(rows: &[TableRow], games: &[FailedGame], failure_reason: &str, n: usize) -> Vec<UserFailures> {
    let failed: Vec<&TableRow> = rows
        .iter()
        .filter(|r| r.is_failure(failure_reason) && !r.user_id.trim().is_empty())
        .collect();
    let table: FrequencyTable = failed.iter().map(|r| r.user_id.trim()).collect();
    let sizes = sizes_by_game(games);

    table
        .top(n)
        .into_iter()
        .map(|(user_id, failures)| {
            let mut game_sizes: Vec<GameSize> = failed
                .iter()
                .filter(|r| r.user_id.trim() == user_id)
                .map(|r| sizes.get(r.game_id.trim()).copied().unwrap_or(GameSize::Unknown))
                .collect();
            game_sizes.sort();
            game_sizes.dedup();
            UserFailures {
                percentage: percentage(failures, failed.len()),
                user_id,
                failures,
                game_sizes,
            }
        })
        .collect()
}
