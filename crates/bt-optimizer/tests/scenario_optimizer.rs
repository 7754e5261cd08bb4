use std::collections::HashMap;

use bt_candle::{Call, Chain};
use bt_optimizer::{optimize, optimize_per_caller, OptimizerConfig, PolicyTypesEnabled};
use bt_testkit::{anchor_ms, build_series, Bar};

fn four_calls_with_a_mild_pump() -> (Vec<Call>, HashMap<String, Vec<bt_candle::Candle>>) {
    let mut calls = vec![];
    let mut candles_by_call = HashMap::new();

    for i in 0..4 {
        let start_ts_s = 1_000_000 + i * 10_000;
        let id = format!("call{i}");
        let candles = build_series(
            1.0,
            start_ts_s,
            60,
            &[Bar::new(1.0, 1.0, 1.0), Bar::new(1.5, 0.95, 1.3)],
        );
        let t0 = anchor_ms(start_ts_s);
        calls.push(Call::new(&id, "alice", "mint", Chain::Solana, t0, None));
        candles_by_call.insert(id, candles);
    }

    (calls, candles_by_call)
}

#[test]
fn fixed_stop_only_grid_finds_a_feasible_best_policy() {
    let (calls, candles_by_call) = four_calls_with_a_mild_pump();
    let config = OptimizerConfig {
        policy_types_enabled: PolicyTypesEnabled {
            fixed_stop: true,
            time_stop: false,
            trailing_stop: false,
            ladder: false,
        },
        ..OptimizerConfig::default()
    };

    let result = optimize(&calls, &candles_by_call, &config).unwrap();

    assert!(result.policies_evaluated > 0);
    assert!(result.feasible_policies > 0);
    assert!(result.split_metadata.is_none());

    let best = result.best_policy.expect("expected a feasible best policy");
    assert!(best.score.constraints_satisfied);
    assert!(best.policy_id.starts_with("fixed_stop_"));

    // Ranking is monotone: no later entry's selection score beats an earlier one.
    for pair in result.evaluated.windows(2) {
        let ord = bt_scorer::compare_scores(pair[0].selection_score(), pair[1].selection_score());
        assert_ne!(ord, std::cmp::Ordering::Less);
    }
}

#[test]
fn optimize_per_caller_partitions_independently() {
    let (mut calls, mut candles_by_call) = four_calls_with_a_mild_pump();
    // Add a second caller with its own calls.
    for i in 0..2 {
        let start_ts_s = 2_000_000 + i * 10_000;
        let id = format!("bob{i}");
        let candles = build_series(
            1.0,
            start_ts_s,
            60,
            &[Bar::new(1.0, 1.0, 1.0), Bar::new(1.2, 0.9, 1.1)],
        );
        let t0 = anchor_ms(start_ts_s);
        calls.push(Call::new(&id, "bob", "mint", Chain::Solana, t0, None));
        candles_by_call.insert(id, candles);
    }

    let config = OptimizerConfig {
        policy_types_enabled: PolicyTypesEnabled {
            fixed_stop: true,
            time_stop: false,
            trailing_stop: false,
            ladder: false,
        },
        ..OptimizerConfig::default()
    };

    let per_caller = optimize_per_caller(&calls, &candles_by_call, &config).unwrap();

    assert_eq!(per_caller.len(), 2);
    assert!(per_caller.contains_key("alice"));
    assert!(per_caller.contains_key("bob"));
}

#[test]
fn caller_groups_filter_restricts_which_callers_are_optimized() {
    let (mut calls, mut candles_by_call) = four_calls_with_a_mild_pump();
    let id = "bob0".to_string();
    let candles = build_series(1.0, 3_000_000, 60, &[Bar::new(1.0, 1.0, 1.0), Bar::new(1.2, 0.9, 1.1)]);
    let t0 = anchor_ms(3_000_000);
    calls.push(Call::new(&id, "bob", "mint", Chain::Solana, t0, None));
    candles_by_call.insert(id, candles);

    let config = OptimizerConfig {
        caller_groups_filter: Some(vec!["alice".to_string()]),
        policy_types_enabled: PolicyTypesEnabled {
            fixed_stop: true,
            time_stop: false,
            trailing_stop: false,
            ladder: false,
        },
        ..OptimizerConfig::default()
    };

    let per_caller = optimize_per_caller(&calls, &candles_by_call, &config).unwrap();

    assert_eq!(per_caller.len(), 1);
    assert!(per_caller.contains_key("alice"));
}
