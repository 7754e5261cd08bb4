use std::cmp::Ordering;
use std::collections::HashMap;

use bt_engine::PolicyResult;
use bt_metrics::PathMetrics;

use crate::percentile::{median, percentile, sorted_copy};
use crate::types::{
    Constraints, ObjectiveBreakdown, PolicyScore, PrimaryMetric, ScoreMetrics, ScorerOptions,
    TieBreakers, Violations,
};

/// Score one policy's results.
///
/// Two scoring paths exist depending on whether `path_metrics` is supplied:
///
/// - With path metrics: the full documented objective (`base` from the
///   selected primary metric, `dd_penalty`, `timing_boost`, `consistency`,
///   `tail_bonus`), only evaluated when all hard constraints pass.
/// - Without path metrics: a simplified proxy,
///   `median(tail_capture)*100 - median(|mae_bps|)/100`, used as a
///   fallback when per-call truth rows are unavailable to the caller.
///
/// `results` pairs each `PolicyResult` with the `call_id` it was produced
/// for, so path metrics (keyed by call id) can be joined in for the full
/// objective path.
pub fn score_policy(
    results: &[(String, PolicyResult)],
    path_metrics: Option<&HashMap<String, PathMetrics>>,
    options: &ScorerOptions,
) -> PolicyScore {
    if results.is_empty() {
        return PolicyScore::empty();
    }

    let n = results.len();
    let stop_out_rate = results.iter().filter(|(_, r)| r.stop_out).count() as f64 / n as f64;
    let avg_time_exposed_ms =
        results.iter().map(|(_, r)| r.time_exposed_ms as f64).sum::<f64>() / n as f64;

    let tail_captures: Vec<f64> = results.iter().filter_map(|(_, r)| r.tail_capture).collect();
    let avg_tail_capture = if tail_captures.is_empty() {
        0.0
    } else {
        tail_captures.iter().sum::<f64>() / tail_captures.len() as f64
    };

    let mae_sorted = sorted_copy(
        &results
            .iter()
            .map(|(_, r)| r.max_adverse_excursion_bps)
            .collect::<Vec<_>>(),
    );
    let p95_drawdown_bps = percentile(&mae_sorted, 0.05);
    let median_drawdown_magnitude_bps = median(&mae_sorted).abs();

    let return_sorted = sorted_copy(
        &results
            .iter()
            .map(|(_, r)| r.realized_return_bps)
            .collect::<Vec<_>>(),
    );
    let median_return_bps = median(&return_sorted);

    let metrics = ScoreMetrics {
        n,
        stop_out_rate,
        p95_drawdown_bps,
        avg_time_exposed_ms,
        avg_tail_capture,
        median_return_bps,
    };

    let violations = evaluate_violations(&metrics, &options.constraints);
    let constraints_satisfied = !violations.any();

    let tie_breakers = TieBreakers {
        avg_tail_capture,
        median_return_proxy: median_return_bps,
        median_drawdown_magnitude_bps,
    };

    if !constraints_satisfied {
        return PolicyScore {
            score: f64::NEG_INFINITY,
            constraints_satisfied,
            violations,
            tie_breakers,
            metrics,
            objective_breakdown: None,
        };
    }

    let (score, objective_breakdown) = match path_metrics {
        Some(map) => {
            let (score, breakdown) = full_objective(results, map, &return_sorted, options);
            (score, Some(breakdown))
        }
        None => (simplified_proxy(&tail_captures, &mae_sorted), None),
    };

    PolicyScore {
        score,
        constraints_satisfied,
        violations,
        tie_breakers,
        metrics,
        objective_breakdown,
    }
}

fn evaluate_violations(metrics: &ScoreMetrics, constraints: &Constraints) -> Violations {
    Violations {
        stop_out_rate: metrics.stop_out_rate > constraints.max_stop_out_rate,
        p95_drawdown: metrics.p95_drawdown_bps < constraints.max_p95_drawdown_bps,
        time_exposed: metrics.avg_time_exposed_ms > constraints.max_time_exposed_ms as f64,
    }
}

fn simplified_proxy(tail_captures: &[f64], mae_sorted: &[f64]) -> f64 {
    let tail_median = if tail_captures.is_empty() {
        0.0
    } else {
        median(&sorted_copy(tail_captures))
    };
    let abs_mae_sorted = sorted_copy(&mae_sorted.iter().map(|v| v.abs()).collect::<Vec<_>>());
    let mae_median = median(&abs_mae_sorted);
    tail_median * 100.0 - mae_median / 100.0
}

fn full_objective(
    results: &[(String, PolicyResult)],
    path_metrics: &HashMap<String, PathMetrics>,
    return_sorted: &[f64],
    options: &ScorerOptions,
) -> (f64, ObjectiveBreakdown) {
    let joined: Vec<&PathMetrics> = results
        .iter()
        .filter_map(|(call_id, _)| path_metrics.get(call_id))
        .collect();

    let base_value = match options.primary_metric {
        PrimaryMetric::MedianAth => {
            if joined.is_empty() {
                0.0
            } else {
                let peaks = sorted_copy(&joined.iter().map(|pm| pm.peak_multiple).collect::<Vec<_>>());
                median(&peaks)
            }
        }
        PrimaryMetric::AvgR => {
            1.0 + results.iter().map(|(_, r)| r.realized_return_bps).sum::<f64>()
                / results.len() as f64
                / 10_000.0
        }
        PrimaryMetric::MedianReturn => 1.0 + median(return_sorted) / 10_000.0,
    };
    let base = if base_value > 0.0 { base_value.ln() } else { 0.0 };

    let dd = if joined.is_empty() {
        0.0
    } else {
        let dd_bps_values: Vec<f64> = joined
            .iter()
            .map(|pm| pm.dd_to_2x_bps.unwrap_or(pm.dd_bps).abs())
            .collect();
        median(&sorted_copy(&dd_bps_values)) / 10_000.0
    };
    let dd_penalty = if dd <= 0.30 {
        0.0
    } else {
        let raw = (options.k * (dd - 0.30)).exp() - 1.0;
        if dd > 0.60 {
            raw * (1.0 + options.brutal_mult * (dd - 0.60))
        } else {
            raw
        }
    };

    let hit2x_count = joined.iter().filter(|pm| pm.hit_2x).count();
    let hit2x_rate = if joined.is_empty() {
        0.0
    } else {
        hit2x_count as f64 / joined.len() as f64
    };
    let t2x_minutes: Vec<f64> = joined
        .iter()
        .filter_map(|pm| pm.t_2x_ms.map(|t| (t - pm.t0_ms) as f64 / 60_000.0))
        .collect();
    let timing_boost = if t2x_minutes.is_empty() {
        0.0
    } else {
        let median_t2x_min = median(&sorted_copy(&t2x_minutes));
        if median_t2x_min > 0.0 {
            (1.0 + options.target_min / median_t2x_min).ln().min(0.5)
        } else {
            0.5
        }
    };

    let consistency = (hit2x_rate - 0.50).max(0.0) * 0.30;

    let tail_bonus = if return_sorted.len() >= 2 {
        let p95 = percentile(return_sorted, 0.95);
        let p75 = percentile(return_sorted, 0.75);
        if p75 > 0.0 {
            ((p95 / p75) - 1.0).max(0.0) * 0.10
        } else {
            0.0
        }
    } else {
        0.0
    };

    let score = base + timing_boost + consistency + tail_bonus - dd_penalty;
    (
        score,
        ObjectiveBreakdown {
            base,
            dd_penalty,
            timing_boost,
            consistency,
            tail_bonus,
        },
    )
}

/// Comparison contract (spec §4.3): feasible beats infeasible; among
/// infeasible, fewer violations beats more; then score; then tie-breakers
/// (higher avg tail_capture, then higher median return proxy, then smaller
/// median drawdown magnitude).
pub fn compare_scores(a: &PolicyScore, b: &PolicyScore) -> Ordering {
    match (a.constraints_satisfied, b.constraints_satisfied) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }
    if !a.constraints_satisfied {
        // both infeasible: fewer violations wins
        let ord = b.violations.count().cmp(&a.violations.count());
        if ord != Ordering::Equal {
            return ord;
        }
    }
    let ord = a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal);
    if ord != Ordering::Equal {
        return ord;
    }
    let ord = a
        .tie_breakers
        .avg_tail_capture
        .partial_cmp(&b.tie_breakers.avg_tail_capture)
        .unwrap_or(Ordering::Equal);
    if ord != Ordering::Equal {
        return ord;
    }
    let ord = a
        .tie_breakers
        .median_return_proxy
        .partial_cmp(&b.tie_breakers.median_return_proxy)
        .unwrap_or(Ordering::Equal);
    if ord != Ordering::Equal {
        return ord;
    }
    b.tie_breakers
        .median_drawdown_magnitude_bps
        .partial_cmp(&a.tie_breakers.median_drawdown_magnitude_bps)
        .unwrap_or(Ordering::Equal)
}
