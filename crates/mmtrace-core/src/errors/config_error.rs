//! Configuration errors.

use super::error_code::{self, MmtraceErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config value for {field}: {message}")]
    Invalid { field: String, message: String },
}

impl MmtraceErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => error_code::CONFIG_PARSE_ERROR,
            Self::Io(_) => error_code::IO_ERROR,
            Self::Invalid { .. } => error_code::CONFIG_INVALID,
        }
    }
}
