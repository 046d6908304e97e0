//! Threshold alert rules evaluated against provider time series.

use serde::{Deserialize, Serialize};

use super::source::Provider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCondition {
    /// Window total strictly above `threshold`.
    Gt,
    /// Window total strictly below `threshold`.
    Lt,
    /// Total fell by at least `threshold` percent vs the previous window.
    DropsByPct,
    /// Total rose by at least `threshold` percent vs the previous window.
    RisesByPct,
}

impl AlertCondition {
    pub fn needs_previous_window(&self) -> bool {
        matches!(self, AlertCondition::DropsByPct | AlertCondition::RisesByPct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub source: Provider,
    /// Series name, e.g. `sessions`.
    pub metric: String,
    pub condition: AlertCondition,
    pub threshold: f64,
    /// Lookback length in days, ending at the evaluation range's end.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_window_days() -> u32 {
    7
}

fn default_enabled() -> bool {
    true
}

/// Rule skipped during an evaluation pass, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRule {
    pub rule_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvaluation {
    pub triggered: Vec<String>,
    pub skipped: Vec<SkippedRule>,
}
