use std::cmp::Ordering;

use bt_engine::{ExitReason, PolicyResult};
use bt_scorer::{compare_scores, score_policy, Constraints, PolicyScore, ScorerOptions};

fn result(
    realized_return_bps: f64,
    stop_out: bool,
    mae_bps: f64,
    time_exposed_ms: i64,
    tail_capture: Option<f64>,
) -> PolicyResult {
    PolicyResult {
        entry_ts_ms: Some(0),
        entry_px: Some(1.0),
        exit_ts_ms: Some(time_exposed_ms),
        exit_px: Some(1.0),
        realized_return_bps,
        stop_out,
        max_adverse_excursion_bps: mae_bps,
        time_exposed_ms,
        tail_capture,
        exit_reason: if stop_out {
            ExitReason::StopLoss
        } else {
            ExitReason::TakeProfit
        },
    }
}

#[test]
fn empty_results_produce_insufficient_data_sentinel() {
    let score = score_policy(&[], None, &ScorerOptions::default());
    assert!(score.is_empty());
    assert_eq!(score.score, f64::NEG_INFINITY);
    assert!(!score.constraints_satisfied);
}

#[test]
fn feasibility_requires_all_three_constraints() {
    let options = ScorerOptions {
        constraints: Constraints {
            max_stop_out_rate: 0.30,
            max_p95_drawdown_bps: -500.0,
            max_time_exposed_ms: 1_000,
        },
        ..ScorerOptions::default()
    };

    let pairs = vec![
        ("c1".to_string(), result(500.0, false, -200.0, 500, Some(0.8))),
        ("c2".to_string(), result(300.0, false, -6000.0, 500, Some(0.5))),
    ];

    let score = score_policy(&pairs, None, &options);
    assert!(!score.constraints_satisfied);
    assert!(score.violations.p95_drawdown);
    assert_eq!(score.score, f64::NEG_INFINITY);
}

#[test]
fn score_is_neg_infinity_iff_constraints_fail() {
    let options = ScorerOptions::default();
    let feasible = vec![
        ("c1".to_string(), result(1000.0, false, -100.0, 1_000, Some(0.9))),
        ("c2".to_string(), result(1200.0, false, -150.0, 1_000, Some(0.85))),
    ];
    let score = score_policy(&feasible, None, &options);
    assert!(score.constraints_satisfied);
    assert!(score.score > f64::NEG_INFINITY);
}

#[test]
fn compare_scores_prefers_feasible_over_infeasible() {
    let feasible = PolicyScore {
        score: -100.0,
        constraints_satisfied: true,
        ..PolicyScore::empty()
    };
    let infeasible = PolicyScore {
        score: 9999.0,
        constraints_satisfied: false,
        ..PolicyScore::empty()
    };
    assert_eq!(compare_scores(&feasible, &infeasible), Ordering::Greater);
}

#[test]
fn compare_scores_falls_back_to_tie_breakers() {
    let mut a = PolicyScore::empty();
    a.constraints_satisfied = true;
    a.score = 1.0;
    a.tie_breakers.avg_tail_capture = 0.9;

    let mut b = PolicyScore::empty();
    b.constraints_satisfied = true;
    b.score = 1.0;
    b.tie_breakers.avg_tail_capture = 0.5;

    assert_eq!(compare_scores(&a, &b), Ordering::Greater);
}
