//! Session attempt record: one user's single matchmaking try.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAttempt {
    /// Registration id; unique within an analysis run.
    pub session_id: String,
    /// Client app version. `None` when the source value was not an integer.
    pub app_version: Option<i64>,
    /// Raw log text, once the log-retrieval step has found it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_text: Option<String>,
    /// Capacity of the target game, when known.
    pub capacity: Option<i64>,
    /// Participant count recorded against the game, when known.
    pub participant_count: Option<i64>,
    /// Creation timestamp as recorded upstream, unparsed.
    pub created_at: Option<String>,
}

impl SessionAttempt {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.app_version = Some(version);
        self
    }

    pub fn with_log(mut self, log_text: impl Into<String>) -> Self {
        self.log_text = Some(log_text.into());
        self
    }

    /// Whether the app version is at or above `minimum`. Unknown versions are not.
    pub fn meets_version(&self, minimum: i64) -> bool {
        self.app_version.is_some_and(|v| v >= minimum)
    }
}
