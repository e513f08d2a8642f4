//! Game-level analyses over a game-user table: failed-game grouping, capacity
//! reports, timing, simultaneous failures and failing users.

pub mod report;
pub mod row;
pub mod simultaneous;
pub mod timing;
pub mod users;

pub use report::{CapacityReport, FishyRate, MissedMergeSummary, ParticipantBucket, SixPlayerBreakdown, SuspiciousGroup};
pub use row::{group_failed_games, FailedGame, TableRow};
pub use simultaneous::{missed_merges, simultaneous_failures, SimultaneousGroup};
pub use timing::{parse_timestamp, slow_failures, wait_seconds, TimingReport, WaitBucket};
pub use users::{top_failing_users, UserFailures};
