//! Classification errors.
//!
//! Only caller contract violations live here. A marker missing from a log is
//! evidence, not an error, and is reported through a FAILED stage verdict.

use super::error_code::{self, MmtraceErrorCode};
use crate::types::stage::Stage;

/// Errors the classification engine may raise.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("session id must not be empty")]
    EmptySessionId,

    #[error("session id {session_id:?} contains a line break")]
    InvalidSessionId { session_id: String },

    #[error("marker {role} for stage {stage} could not be compiled: {message}")]
    InvalidMarker {
        stage: Stage,
        role: &'static str,
        message: String,
    },
}

impl MmtraceErrorCode for ClassifyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptySessionId => error_code::EMPTY_SESSION_ID,
            Self::InvalidSessionId { .. } => error_code::INVALID_SESSION_ID,
            Self::InvalidMarker { .. } => error_code::INVALID_MARKER,
        }
    }
}

/// Validate a session id against the engine's contract.
pub fn check_session_id(session_id: &str) -> Result<(), ClassifyError> {
    if session_id.trim().is_empty() {
        return Err(ClassifyError::EmptySessionId);
    }
    if session_id.contains(['\n', '\r']) {
        return Err(ClassifyError::InvalidSessionId {
            session_id: session_id.to_string(),
        });
    }
    Ok(())
}
