use serde::{Deserialize, Serialize};

use bt_engine::Fees;
use bt_overfit::{OverfitConfig, OverfitReport};
use bt_policy::RiskPolicy;
use bt_scorer::{Constraints, PolicyScore, ScorerOptions};
use bt_validation::SplitConfig;

/// Which policy families the grid search generates. `Combo` is not gated
/// here: it is generated automatically for non-high-multiple callers
/// whenever both `ladder` and `trailing_stop` are enabled (spec §4.6 step 3).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyTypesEnabled {
    pub fixed_stop: bool,
    pub time_stop: bool,
    pub trailing_stop: bool,
    pub ladder: bool,
}

impl Default for PolicyTypesEnabled {
    fn default() -> Self {
        Self {
            fixed_stop: true,
            time_stop: true,
            trailing_stop: true,
            ladder: true,
        }
    }
}

/// Percentile thresholds that classify a caller as "high-multiple" from
/// their train-set peak-multiple distribution (spec §4.6 step 2).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighMultipleConfig {
    pub p95_threshold: f64,
    pub p75_threshold: f64,
}

impl Default for HighMultipleConfig {
    fn default() -> Self {
        Self {
            p95_threshold: 20.0,
            p75_threshold: 5.0,
        }
    }
}

/// Top-level configuration accepted by the optimizer (spec §6
/// "Configuration"). Every field has a documented default; unknown JSON
/// keys are rejected by `serde`'s default struct behavior at the call site,
/// not silently ignored by the optimizer itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub constraints: Constraints,
    pub fees: Fees,
    pub scorer: ScorerOptions,
    pub policy_types_enabled: PolicyTypesEnabled,
    pub high_multiple: HighMultipleConfig,
    pub caller_groups_filter: Option<Vec<String>>,
    pub validation_split: Option<SplitConfig>,
    pub overfitting: OverfitConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            constraints: Constraints::default(),
            fees: Fees::default(),
            scorer: ScorerOptions::default(),
            policy_types_enabled: PolicyTypesEnabled::default(),
            high_multiple: HighMultipleConfig::default(),
            caller_groups_filter: None,
            validation_split: None,
            overfitting: OverfitConfig::default(),
        }
    }
}

/// One policy's full evaluation: its score on the train subset, its score
/// on the validation subset (when a split was configured and produced a
/// non-empty validation set), and the resulting overfitting classification.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluatedPolicy {
    pub policy: RiskPolicy,
    pub policy_id: String,
    pub train_score: PolicyScore,
    pub validation_score: Option<PolicyScore>,
    pub overfit: Option<OverfitReport>,
}

impl EvaluatedPolicy {
    /// The score this policy is ranked and selected by: validation-if-available,
    /// else train (spec §9, Open Question 2's resolution).
    pub fn selection_score(&self) -> &PolicyScore {
        self.validation_score.as_ref().unwrap_or(&self.train_score)
    }

    fn is_overfit_flagged(&self) -> bool {
        self.overfit
            .as_ref()
            .map(|o| o.overfitting_detected)
            .unwrap_or(false)
    }
}

/// The selected best policy, if any feasible candidate exists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptimalPolicy {
    pub policy: RiskPolicy,
    pub policy_id: String,
    pub score: PolicyScore,
    pub overfit: Option<OverfitReport>,
}

/// The full result of one `optimize` call over one partition of calls.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub best_policy: Option<OptimalPolicy>,
    pub evaluated: Vec<EvaluatedPolicy>,
    pub policies_evaluated: usize,
    pub feasible_policies: usize,
    pub split_metadata: Option<bt_validation::SplitMetadata>,
}

pub(crate) fn select_best(evaluated: &[EvaluatedPolicy]) -> Option<OptimalPolicy> {
    // `evaluated` is already sorted by `compare_scores` on the selection
    // score, descending -- feasibility beats infeasibility beats nothing
    // inside that ordering, so a linear scan for the first match at each
    // tier is sufficient and preserves the documented tie-break order.
    let not_overfit_feasible = evaluated
        .iter()
        .find(|e| e.selection_score().constraints_satisfied && !e.is_overfit_flagged());
    if let Some(e) = not_overfit_feasible {
        return Some(to_optimal(e));
    }
    evaluated
        .iter()
        .find(|e| e.selection_score().constraints_satisfied)
        .map(to_optimal)
}

fn to_optimal(e: &EvaluatedPolicy) -> OptimalPolicy {
    OptimalPolicy {
        policy: e.policy.clone(),
        policy_id: e.policy_id.clone(),
        score: e.selection_score().clone(),
        overfit: e.overfit,
    }
}
