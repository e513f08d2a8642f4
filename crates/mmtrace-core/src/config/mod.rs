pub mod analysis_config;
pub mod marker_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub use analysis_config::{AnalysisConfig, MAX_MERGE_WINDOW_SECS};
pub use marker_config::{CaptureSpec, MarkerSpec, MarkerTable, Span, StageMarkers, SESSION_PLACEHOLDER};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MmtraceConfig {
    pub markers: MarkerTable,
    pub analysis: AnalysisConfig,
}

impl MmtraceConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "config file read");
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.markers.validate()?;

        let a = &self.analysis;
        if a.merge_window_secs <= 0 || a.merge_window_secs > MAX_MERGE_WINDOW_SECS {
            return Err(ConfigError::Invalid {
                field: "analysis.merge_window_secs".to_string(),
                message: format!(
                    "must be between 1 and {MAX_MERGE_WINDOW_SECS}, got {}",
                    a.merge_window_secs
                ),
            });
        }
        if a.cgp_origin.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "analysis.cgp_origin".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if !(a.quick_failure_secs >= 0.0 && a.quick_failure_secs <= a.slow_failure_secs) {
            return Err(ConfigError::Invalid {
                field: "analysis.quick_failure_secs".to_string(),
                message: format!(
                    "must be between 0 and slow_failure_secs ({}), got {}",
                    a.slow_failure_secs, a.quick_failure_secs
                ),
            });
        }
        if a.health_moderate_pct > a.health_critical_pct {
            return Err(ConfigError::Invalid {
                field: "analysis.health_moderate_pct".to_string(),
                message: "must not exceed health_critical_pct".to_string(),
            });
        }
        Ok(())
    }
}
