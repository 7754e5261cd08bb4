use std::collections::HashMap;

use bt_candle::Call;

use crate::lcg::fisher_yates_shuffle;
use crate::types::{SplitConfig, SplitMetadata, SplitResult, SplitStrategy};

fn train_count(n: usize, train_fraction: f64) -> usize {
    ((train_fraction * n as f64).round() as usize).clamp(0, n)
}

/// Partition `calls` into train/validation per `config`. Returns metadata
/// sufficient to exactly reconstruct the split later.
pub fn split<'a>(config: &SplitConfig, calls: &'a [Call]) -> SplitResult<'a> {
    match config.strategy {
        SplitStrategy::TimeBased => split_time_based(config, calls),
        SplitStrategy::CallerBased => split_caller_based(config, calls),
        SplitStrategy::Random => split_random(config, calls),
    }
}

fn split_time_based<'a>(config: &SplitConfig, calls: &'a [Call]) -> SplitResult<'a> {
    let mut ordered: Vec<&Call> = calls.iter().collect();
    ordered.sort_by_key(|c| c.created_at_ms);

    let n_train = train_count(ordered.len(), config.train_fraction);
    let train: Vec<&Call> = ordered[..n_train].to_vec();
    let validation: Vec<&Call> = ordered[n_train..].to_vec();

    let train_range_ms = range_of(&train);
    let validation_range_ms = range_of(&validation);

    SplitResult {
        train,
        validation,
        metadata: SplitMetadata::TimeBased {
            train_range_ms,
            validation_range_ms,
        },
    }
}

fn range_of(calls: &[&Call]) -> (i64, i64) {
    match (calls.first(), calls.last()) {
        (Some(first), Some(last)) => (first.created_at_ms, last.created_at_ms),
        _ => (0, 0),
    }
}

fn split_caller_based<'a>(config: &SplitConfig, calls: &'a [Call]) -> SplitResult<'a> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for c in calls {
        *counts.entry(c.caller.as_str()).or_insert(0) += 1;
    }

    let mut callers: Vec<&str> = counts.keys().copied().collect();
    // Descending call count, then ascending name -- stable and reproducible
    // regardless of the input calls' original order.
    callers.sort_by(|a, b| counts[b].cmp(&counts[a]).then_with(|| a.cmp(b)));

    let n_train = train_count(callers.len(), config.train_fraction);
    let train_callers: Vec<String> = callers[..n_train].iter().map(|s| s.to_string()).collect();
    let validation_callers: Vec<String> = callers[n_train..].iter().map(|s| s.to_string()).collect();

    let train_set: std::collections::HashSet<&str> =
        train_callers.iter().map(|s| s.as_str()).collect();

    let mut train = vec![];
    let mut validation = vec![];
    for c in calls {
        if train_set.contains(c.caller.as_str()) {
            train.push(c);
        } else {
            validation.push(c);
        }
    }

    SplitResult {
        train,
        validation,
        metadata: SplitMetadata::CallerBased {
            train_callers,
            validation_callers,
        },
    }
}

fn split_random<'a>(config: &SplitConfig, calls: &'a [Call]) -> SplitResult<'a> {
    let seed = config.random_seed.unwrap_or(0);
    let mut shuffled: Vec<&Call> = calls.iter().collect();
    fisher_yates_shuffle(&mut shuffled, seed);

    let n_train = train_count(shuffled.len(), config.train_fraction);
    let train = shuffled[..n_train].to_vec();
    let validation = shuffled[n_train..].to_vec();

    SplitResult {
        train,
        validation,
        metadata: SplitMetadata::Random { seed },
    }
}
