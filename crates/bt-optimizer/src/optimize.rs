use std::collections::HashMap;

use rayon::prelude::*;

use bt_candle::{Call, Candle};
use bt_engine::{ExitReason, Fees, PolicyResult};
use bt_errors::KernelError;
use bt_metrics::{compute_path_metrics, PathMetrics, PathMetricsOptions};
use bt_overfit::detect_overfitting;
use bt_policy::{policy_id, RiskPolicy};
use bt_scorer::{compare_scores, score_policy};
use bt_validation::split;

use crate::grid::generate_grid;
use crate::profile::is_high_multiple_caller;
use crate::types::{select_best, EvaluatedPolicy, OptimizationResult, OptimizerConfig};

/// One (policy, call) execution outcome that survived "no_entry" filtering,
/// tagged with which split side it belongs to. This is the unit of work
/// fanned out across worker threads (spec §5): each entry is independent of
/// every other, and the reduction into per-policy score sets happens after
/// every worker has finished.
struct RawResult {
    policy_idx: usize,
    call_id: String,
    result: PolicyResult,
    is_train: bool,
}

/// Run the grid search over one partition of calls (already restricted to a
/// single caller, or to however the caller of this function wants to group
/// work -- this function itself is caller-agnostic).
///
/// Steps (spec §4.6): compute the train-only high-multiple profile, generate
/// the policy grid, apply the validation split, execute every (policy, call)
/// pair, score each policy on train (and validation, if non-empty), classify
/// overfitting, rank, and select the best feasible/non-overfit policy.
pub fn optimize(
    calls: &[Call],
    candles_by_call: &HashMap<String, Vec<Candle>>,
    config: &OptimizerConfig,
) -> Result<OptimizationResult, KernelError> {
    let (train_calls, validation_calls, split_metadata) = match &config.validation_split {
        Some(split_config) => {
            let result = split::split(split_config, calls);
            (
                result.train.into_iter().cloned().collect::<Vec<_>>(),
                result.validation.into_iter().cloned().collect::<Vec<_>>(),
                Some(result.metadata),
            )
        }
        None => (calls.to_vec(), Vec::new(), None),
    };

    let path_metrics_opts = PathMetricsOptions::default();
    let path_metrics_map = build_path_metrics_map(calls, candles_by_call, &path_metrics_opts)?;

    let train_path_metrics: Vec<&PathMetrics> = train_calls
        .iter()
        .filter_map(|c| path_metrics_map.get(&c.id))
        .collect();
    let high_multiple = is_high_multiple_caller(&train_path_metrics, &config.high_multiple);

    let policies = generate_grid(
        &crate::grid::PolicyGridConfig::default(),
        &config.policy_types_enabled,
        high_multiple,
    )?;

    let raw_results = execute_grid(&policies, &train_calls, &validation_calls, candles_by_call, &config.fees)?;

    let mut evaluated = build_evaluated_policies(
        &policies,
        raw_results,
        &path_metrics_map,
        !validation_calls.is_empty(),
        config,
    );

    // Sort by selection score (validation-if-available, else train),
    // descending, using the full comparison contract (feasibility tier,
    // then violation count, then score, then tie-breakers).
    evaluated.sort_by(|a, b| compare_scores(a.selection_score(), b.selection_score()).reverse());

    let feasible_policies = evaluated
        .iter()
        .filter(|e| e.selection_score().constraints_satisfied)
        .count();
    let policies_evaluated = evaluated.len();
    let best_policy = select_best(&evaluated);

    tracing::info!(
        policies_evaluated,
        feasible_policies,
        high_multiple_caller = high_multiple,
        "optimizer grid search complete"
    );

    Ok(OptimizationResult {
        best_policy,
        evaluated,
        policies_evaluated,
        feasible_policies,
        split_metadata,
    })
}

/// Partition `calls` by caller (optionally restricted to
/// `config.caller_groups_filter`) and run [`optimize`] independently for
/// each one (spec §4.6, "per-caller entry point").
pub fn optimize_per_caller(
    calls: &[Call],
    candles_by_call: &HashMap<String, Vec<Candle>>,
    config: &OptimizerConfig,
) -> Result<HashMap<String, OptimizationResult>, KernelError> {
    let mut by_caller: HashMap<String, Vec<Call>> = HashMap::new();
    for call in calls {
        if let Some(filter) = &config.caller_groups_filter {
            if !filter.contains(&call.caller) {
                continue;
            }
        }
        by_caller.entry(call.caller.clone()).or_default().push(call.clone());
    }

    let mut out = HashMap::with_capacity(by_caller.len());
    for (caller, caller_calls) in by_caller {
        let result = optimize(&caller_calls, candles_by_call, config)?;
        out.insert(caller, result);
    }
    Ok(out)
}

fn build_path_metrics_map(
    calls: &[Call],
    candles_by_call: &HashMap<String, Vec<Candle>>,
    options: &PathMetricsOptions,
) -> Result<HashMap<String, PathMetrics>, KernelError> {
    let mut map = HashMap::with_capacity(calls.len());
    for call in calls {
        let candles = match candles_by_call.get(&call.id) {
            Some(c) => c,
            None => continue,
        };
        let pm = compute_path_metrics(&call.id, candles, call.t0_ms(), options)?;
        map.insert(call.id.clone(), pm);
    }
    Ok(map)
}

/// Fan out every (policy, call) pair across worker threads. Each worker
/// receives a read-only view of the candle slice and the immutable policy
/// value (spec §5); `no_entry` outcomes are dropped here rather than scored.
/// The only fallible step is `bt_engine::execute` itself (malformed
/// candles); any such error aborts the whole grid search rather than
/// silently dropping the offending pair.
fn execute_grid(
    policies: &[RiskPolicy],
    train_calls: &[Call],
    validation_calls: &[Call],
    candles_by_call: &HashMap<String, Vec<Candle>>,
    fees: &Fees,
) -> Result<Vec<RawResult>, KernelError> {
    let mut work: Vec<(usize, &Call, bool)> = Vec::with_capacity(
        policies.len() * (train_calls.len() + validation_calls.len()),
    );
    for policy_idx in 0..policies.len() {
        for call in train_calls {
            work.push((policy_idx, call, true));
        }
        for call in validation_calls {
            work.push((policy_idx, call, false));
        }
    }

    let results: Result<Vec<Option<RawResult>>, KernelError> = work
        .par_iter()
        .map(|&(policy_idx, call, is_train)| {
            let candles = match candles_by_call.get(&call.id) {
                Some(c) => c,
                None => return Ok(None),
            };
            let policy = &policies[policy_idx];
            let result = bt_engine::execute(candles, call.t0_ms(), policy, fees)?;
            if matches!(result.exit_reason, ExitReason::NoEntry) {
                return Ok(None);
            }
            Ok(Some(RawResult {
                policy_idx,
                call_id: call.id.clone(),
                result,
                is_train,
            }))
        })
        .collect();

    Ok(results?.into_iter().flatten().collect())
}

fn build_evaluated_policies(
    policies: &[RiskPolicy],
    raw_results: Vec<RawResult>,
    path_metrics_map: &HashMap<String, PathMetrics>,
    has_validation: bool,
    config: &OptimizerConfig,
) -> Vec<EvaluatedPolicy> {
    let mut train_by_policy: Vec<Vec<(String, PolicyResult)>> = vec![Vec::new(); policies.len()];
    let mut validation_by_policy: Vec<Vec<(String, PolicyResult)>> = vec![Vec::new(); policies.len()];

    for raw in raw_results {
        let bucket = if raw.is_train {
            &mut train_by_policy[raw.policy_idx]
        } else {
            &mut validation_by_policy[raw.policy_idx]
        };
        bucket.push((raw.call_id, raw.result));
    }

    policies
        .iter()
        .enumerate()
        .map(|(idx, policy)| {
            let train_score = score_policy(&train_by_policy[idx], Some(path_metrics_map), &config.scorer);
            let validation_score = if has_validation {
                Some(score_policy(
                    &validation_by_policy[idx],
                    Some(path_metrics_map),
                    &config.scorer,
                ))
            } else {
                None
            };
            let overfit = validation_score
                .as_ref()
                .map(|vs| detect_overfitting(train_score.score, vs.score, &config.overfitting));

            EvaluatedPolicy {
                policy: policy.clone(),
                policy_id: policy_id(policy),
                train_score,
                validation_score,
                overfit,
            }
        })
        .collect()
}
