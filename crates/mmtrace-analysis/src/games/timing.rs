//! Wait times from recorded timestamps.
//!
//! Only real `created_at`/`updated_at` pairs are used. A timestamp in none of
//! the known formats yields no wait time.

use chrono::{DateTime, NaiveDateTime};
use mmtrace_core::AnalysisConfig;
use serde::Serialize;

use super::row::FailedGame;
use crate::aggregation::percentage;

/// Formats seen in exported game-user tables, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    // July 27, 2025, 11:52:11.000 AM
    "%B %d, %Y, %I:%M:%S%.f %p",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M:%S",
];

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
}

/// `updated - created` in seconds. Negative spans are treated as unparseable.
pub fn wait_seconds(created_at: &str, updated_at: &str) -> Option<f64> {
    let created = parse_timestamp(created_at)?;
    let updated = parse_timestamp(updated_at)?;
    let millis = (updated - created).num_milliseconds();
    (millis >= 0).then(|| millis as f64 / 1000.0)
}

/// Coarse wait bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitBucket {
    Quick,
    Moderate,
    Slow,
}

impl WaitBucket {
    pub const ALL: [WaitBucket; 3] = [WaitBucket::Quick, WaitBucket::Moderate, WaitBucket::Slow];

    pub fn of(secs: f64, config: &AnalysisConfig) -> Self {
        if secs < config.quick_failure_secs {
            Self::Quick
        } else if secs < config.slow_failure_secs {
            Self::Moderate
        } else {
            Self::Slow
        }
    }

    /// `< 2 seconds`, `2-5 seconds`, `>= 5 seconds` with the default thresholds.
    pub fn label(&self, config: &AnalysisConfig) -> String {
        match self {
            Self::Quick => format!("< {} seconds", config.quick_failure_secs),
            Self::Moderate => format!("{}-{} seconds", config.quick_failure_secs, config.slow_failure_secs),
            Self::Slow => format!(">= {} seconds", config.slow_failure_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketRow {
    pub bucket: String,
    pub games: usize,
    pub percentage: f64,
}

/// Wait statistics over the minimum wait of each failed game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingReport {
    pub games_with_timing: usize,
    pub games_without_timing: usize,
    /// Always in quick, moderate, slow order.
    pub buckets: Vec<BucketRow>,
    pub mean_secs: Option<f64>,
    pub median_secs: Option<f64>,
    pub min_secs: Option<f64>,
    pub max_secs: Option<f64>,
}

impl TimingReport {
    pub fn build<'a>(games: impl IntoIterator<Item = &'a FailedGame>, config: &AnalysisConfig) -> Self {
        let mut waits = Vec::new();
        let mut without = 0;
        for game in games {
            match game.min_wait_secs {
                Some(w) => waits.push(w),
                None => without += 1,
            }
        }
        waits.sort_by(f64::total_cmp);

        let buckets = WaitBucket::ALL
            .iter()
            .map(|bucket| {
                let games = waits.iter().filter(|&&w| WaitBucket::of(w, config) == *bucket).count();
                BucketRow {
                    bucket: bucket.label(config),
                    games,
                    percentage: percentage(games, waits.len()),
                }
            })
            .collect();

        let n = waits.len();
        let median = match n {
            0 => None,
            _ if n % 2 == 1 => Some(waits[n / 2]),
            _ => Some((waits[n / 2 - 1] + waits[n / 2]) / 2.0),
        };

        Self {
            games_with_timing: n,
            games_without_timing: without,
            buckets,
            mean_secs: (n > 0).then(|| waits.iter().sum::<f64>() / n as f64),
            median_secs: median,
            min_secs: waits.first().copied(),
            max_secs: waits.last().copied(),
        }
    }
}

/// Games whose shortest wait reached the slow threshold.
pub fn slow_failures<'a>(games: &'a [FailedGame], config: &AnalysisConfig) -> Vec<&'a FailedGame> {
    games
        .iter()
        .filter(|g| g.min_wait_secs.is_some_and(|w| w >= config.slow_failure_secs))
        .collect()
}
