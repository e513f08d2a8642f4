//! System health verdict from the fishy share of failed games.

use std::fmt;

use mmtrace_core::AnalysisConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthVerdict {
    Critical,
    Moderate,
    Healthy,
}

impl HealthVerdict {
    /// Strictly above the critical threshold is critical, strictly above the
    /// moderate one is moderate.
    pub fn assess(fishy_pct: f64, config: &AnalysisConfig) -> Self {
        if fishy_pct > config.health_critical_pct {
            Self::Critical
        } else if fishy_pct > config.health_moderate_pct {
            Self::Moderate
        } else {
            Self::Healthy
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Moderate => "MODERATE",
            Self::Healthy => "HEALTHY",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::Critical => "high share of failures with enough players present; investigate matchmaking immediately",
            Self::Moderate => "some failures with enough players present; monitor closely",
            Self::Healthy => "most failures are explained by missing players",
        }
    }
}

impl fmt::Display for HealthVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
