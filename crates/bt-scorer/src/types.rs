use serde::{Deserialize, Serialize};

/// Hard constraints a policy's results must satisfy to be feasible.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub max_stop_out_rate: f64,
    /// More negative is worse; the realized p5 drawdown must be >= this floor.
    pub max_p95_drawdown_bps: f64,
    pub max_time_exposed_ms: i64,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_stop_out_rate: 0.30,
            max_p95_drawdown_bps: -3000.0,
            max_time_exposed_ms: 4 * 60 * 60 * 1000,
        }
    }
}

/// Which summary statistic of the call population the objective's `base`
/// term is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryMetric {
    MedianAth,
    AvgR,
    MedianReturn,
}

impl Default for PrimaryMetric {
    fn default() -> Self {
        PrimaryMetric::MedianAth
    }
}

/// Objective constants, all independently overridable; defaults match the
/// documented objective.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerOptions {
    pub primary_metric: PrimaryMetric,
    pub constraints: Constraints,
    pub k: f64,
    pub brutal_mult: f64,
    pub target_min: f64,
}

impl Default for ScorerOptions {
    fn default() -> Self {
        Self {
            primary_metric: PrimaryMetric::default(),
            constraints: Constraints::default(),
            k: 5.0,
            brutal_mult: 10.0,
            target_min: 60.0,
        }
    }
}

/// Which hard constraint(s) a policy failed, in evaluation order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Violations {
    pub stop_out_rate: bool,
    pub p95_drawdown: bool,
    pub time_exposed: bool,
}

impl Violations {
    pub fn count(&self) -> u32 {
        self.stop_out_rate as u32 + self.p95_drawdown as u32 + self.time_exposed as u32
    }

    pub fn any(&self) -> bool {
        self.count() > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TieBreakers {
    pub avg_tail_capture: f64,
    pub median_return_proxy: f64,
    pub median_drawdown_magnitude_bps: f64,
}

/// Population summary statistics a score is built from; always computed,
/// regardless of which scoring path was taken.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoreMetrics {
    pub n: usize,
    pub stop_out_rate: f64,
    pub p95_drawdown_bps: f64,
    pub avg_time_exposed_ms: f64,
    pub avg_tail_capture: f64,
    pub median_return_bps: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ObjectiveBreakdown {
    pub base: f64,
    pub dd_penalty: f64,
    pub timing_boost: f64,
    pub consistency: f64,
    pub tail_bonus: f64,
}

/// The full evaluation of one policy's results against `constraints`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolicyScore {
    pub score: f64,
    pub constraints_satisfied: bool,
    pub violations: Violations,
    pub tie_breakers: TieBreakers,
    pub metrics: ScoreMetrics,
    pub objective_breakdown: Option<ObjectiveBreakdown>,
}

impl PolicyScore {
    /// `InsufficientData` sentinel: zero results scored, never raised as an
    /// error (spec §7).
    pub fn empty() -> Self {
        Self {
            score: f64::NEG_INFINITY,
            constraints_satisfied: false,
            violations: Violations::default(),
            tie_breakers: TieBreakers {
                avg_tail_capture: 0.0,
                median_return_proxy: 0.0,
                median_drawdown_magnitude_bps: 0.0,
            },
            metrics: ScoreMetrics {
                n: 0,
                stop_out_rate: 0.0,
                p95_drawdown_bps: 0.0,
                avg_time_exposed_ms: 0.0,
                avg_tail_capture: 0.0,
                median_return_bps: 0.0,
            },
            objective_breakdown: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.n == 0
    }
}
