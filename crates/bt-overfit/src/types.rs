use serde::{Deserialize, Serialize};

/// Relative-gap thresholds (in percent) that separate overfitting severity
/// bands. A `train` vs `validation` score gap at or below `mild_pct` is not
/// flagged at all; above `severe_pct` is the worst band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverfitConfig {
    pub mild_pct: f64,
    pub moderate_pct: f64,
    pub severe_pct: f64,
}

impl Default for OverfitConfig {
    fn default() -> Self {
        Self {
            mild_pct: 5.0,
            moderate_pct: 15.0,
            severe_pct: 30.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverfitSeverity {
    None,
    Mild,
    Moderate,
    Severe,
}

/// Train-vs-validation comparison for a single policy's scores.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OverfitReport {
    pub overfitting_detected: bool,
    pub severity: OverfitSeverity,
    pub score_gap: f64,
    pub relative_gap_percent: f64,
}
