//! Tabular ingest errors (session tables and game-user tables).

use super::error_code::{self, MmtraceErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("input has no header row")]
    Empty,

    #[error("required column missing: {column}")]
    MissingColumn { column: String },

    #[error("malformed row at line {line}")]
    MalformedRow { line: usize },
}

impl MmtraceErrorCode for IngestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => error_code::EMPTY_INPUT,
            Self::MissingColumn { .. } => error_code::MISSING_COLUMN,
            Self::MalformedRow { .. } => error_code::MALFORMED_ROW,
        }
    }
}
