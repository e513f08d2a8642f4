//! Stable error codes shared by every mmtrace error enum.

/// Maps an error to a stable, machine-readable code for reports and exit paths.
pub trait MmtraceErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const EMPTY_SESSION_ID: &str = "EMPTY_SESSION_ID";
pub const INVALID_SESSION_ID: &str = "INVALID_SESSION_ID";
pub const INVALID_MARKER: &str = "INVALID_MARKER";
pub const CONFIG_PARSE_ERROR: &str = "CONFIG_PARSE_ERROR";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const IO_ERROR: &str = "IO_ERROR";
pub const MISSING_COLUMN: &str = "MISSING_COLUMN";
pub const MALFORMED_ROW: &str = "MALFORMED_ROW";
pub const EMPTY_INPUT: &str = "EMPTY_INPUT";
