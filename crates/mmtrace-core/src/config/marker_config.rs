//! Marker table: the textual evidence each stage looks for.
//!
//! Markers mirror the wording of the game client's logs and change whenever
//! that wording changes, so they are data, not code. The defaults reproduce
//! the client's current wording and can be overridden per stage from TOML.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::stage::Stage;

/// Placeholder substituted with the (escaped) session id at match time.
pub const SESSION_PLACEHOLDER: &str = "{session_id}";

/// How far apart the anchors of one marker may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Span {
    /// Anchors may be separated by any text, including line breaks.
    #[default]
    Document,
    /// All anchors must appear on the same line.
    Line,
}

/// One marker: literal anchors that must appear in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSpec {
    /// Ordered literal substrings. May contain `{session_id}`.
    pub anchors: Vec<String>,
    #[serde(default)]
    pub span: Span,
}

impl MarkerSpec {
    /// Anchors that may span lines.
    pub fn document(anchors: &[&str]) -> Self {
        Self {
            anchors: anchors.iter().map(|a| a.to_string()).collect(),
            span: Span::Document,
        }
    }

    /// Anchors that must share one line.
    pub fn line(anchors: &[&str]) -> Self {
        Self {
            anchors: anchors.iter().map(|a| a.to_string()).collect(),
            span: Span::Line,
        }
    }

    /// Whether the marker is tied to a specific session.
    pub fn is_session_bound(&self) -> bool {
        self.anchors.iter().any(|a| a.contains(SESSION_PLACEHOLDER))
    }
}

/// A named regex with one capture group, evaluated once a stage is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSpec {
    pub name: String,
    /// Regex source. May contain `{session_id}`.
    pub pattern: String,
    /// Record the capture as a number instead of a string.
    #[serde(default)]
    pub numeric: bool,
}

impl CaptureSpec {
    fn new(name: &str, pattern: &str, numeric: bool) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            numeric,
        }
    }
}

/// The marker roles of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageMarkers {
    /// The stage was attempted (API request, socket URL, queue entry).
    pub request: MarkerSpec,
    /// The stage completed.
    pub success: MarkerSpec,
    /// The counterpart explicitly reported failure.
    #[serde(default)]
    pub explicit_failure: Option<MarkerSpec>,
    /// A client-side timer gave up waiting.
    #[serde(default)]
    pub timeout: Option<MarkerSpec>,
    #[serde(default)]
    pub captures: Vec<CaptureSpec>,
}

impl StageMarkers {
    /// Every configured marker with its role name, in priority order.
    pub fn roles(&self) -> Vec<(&'static str, &MarkerSpec)> {
        let mut roles = vec![("request", &self.request), ("success", &self.success)];
        if let Some(m) = &self.explicit_failure {
            roles.push(("explicit_failure", m));
        }
        if let Some(m) = &self.timeout {
            roles.push(("timeout", m));
        }
        roles
    }
}

/// Markers for all four stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerTable {
    pub registration: StageMarkers,
    pub table_assignment: StageMarkers,
    pub socket_connection: StageMarkers,
    pub matchmaking_lifecycle: StageMarkers,
}

impl MarkerTable {
    pub fn for_stage(&self, stage: Stage) -> &StageMarkers {
        match stage {
            Stage::Registration => &self.registration,
            Stage::TableAssignment => &self.table_assignment,
            Stage::SocketConnection => &self.socket_connection,
            Stage::MatchmakingLifecycle => &self.matchmaking_lifecycle,
        }
    }

    /// Reject markers that could never match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for stage in Stage::ALL {
            let markers = self.for_stage(stage);
            for (role, spec) in markers.roles() {
                if spec.anchors.is_empty() || spec.anchors.iter().any(|a| a.is_empty()) {
                    return Err(ConfigError::Invalid {
                        field: format!("markers.{}.{role}", stage.name().to_ascii_lowercase()),
                        message: "anchors must be a non-empty list of non-empty strings".to_string(),
                    });
                }
            }
            for capture in &markers.captures {
                if capture.name.is_empty() {
                    return Err(ConfigError::Invalid {
                        field: format!("markers.{}.captures", stage.name().to_ascii_lowercase()),
                        message: "capture name must not be empty".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

const SESSION_ATTR: &str = "\"registrationId\":\"{session_id}\"";
const GAMEPLAY_EVENT: &str = "eventHandler gameplay socket event-";

impl Default for MarkerTable {
    fn default() -> Self {
        Self {
            registration: StageMarkers {
                request: MarkerSpec::line(&["API New Request: /v1.0/super/tournament/registerTournament"]),
                success: MarkerSpec::document(&[
                    "API Success: /v1.0/super/tournament/registerTournament",
                    SESSION_ATTR,
                ]),
                explicit_failure: None,
                timeout: None,
                captures: vec![CaptureSpec::new(
                    "entry_fee",
                    r#""success":true.*"registrationId":"{session_id}".*"entryFee":([0-9.]+)"#,
                    true,
                )],
            },
            table_assignment: StageMarkers {
                request: MarkerSpec::document(&[
                    "API New Request: /v1.0/super/tournament/getTournamentDetails",
                    SESSION_ATTR,
                ]),
                success: MarkerSpec::document(&[
                    "API Success: /v1.0/super/tournament/getTournamentDetails",
                    SESSION_ATTR,
                    "\"registrationStatus\":\"TABLE_ASSIGNED\"",
                ]),
                explicit_failure: None,
                timeout: None,
                captures: vec![
                    CaptureSpec::new("game_id", r#""gameplayServer":\{[^}]*"gameId":"([^"]+)""#, false),
                    CaptureSpec::new("pod_ip", r#""gameplayServer":\{[^}]*"podip":"([^"]+)""#, false),
                ],
            },
            socket_connection: StageMarkers {
                request: MarkerSpec::line(&["Socket url-", SESSION_ATTR]),
                success: MarkerSpec::line(&["Socket connected with id-", SESSION_ATTR]),
                explicit_failure: Some(MarkerSpec::line(&["Socket connection failed-", SESSION_ATTR])),
                timeout: None,
                captures: Vec::new(),
            },
            matchmaking_lifecycle: StageMarkers {
                request: MarkerSpec::document(&[GAMEPLAY_EVENT, SESSION_ATTR, "\"state\":\"FINDING\""]),
                success: MarkerSpec::document(&[GAMEPLAY_EVENT, SESSION_ATTR, "\"en\":\"ROUND_STARTING\""]),
                explicit_failure: Some(MarkerSpec::document(&[
                    GAMEPLAY_EVENT,
                    SESSION_ATTR,
                    "\"en\":\"MATCH_MAKING_FAILED\"",
                ])),
                timeout: Some(MarkerSpec::line(&["backToLobbyInterval Timer expired"])),
                captures: Vec::new(),
            },
        }
    }
}
