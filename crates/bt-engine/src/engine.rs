use bt_candle::{anchor_index, validate_series, Candle};
use bt_errors::KernelError;
use bt_policy::{policy_id, RiskPolicy};

use crate::runtime::{first_fill_event, tick, PolicyRuntime};
use crate::types::{ExitReason, Fees, PolicyResult};

/// Simulate one exit policy against one call's candle series.
///
/// Pure function of its four arguments: no clock, no RNG, no I/O. The same
/// inputs always produce a bit-for-bit identical `PolicyResult`.
///
/// Intra-candle evaluation order is STOP-first, then TARGETS (via the
/// candle high), then TIME-EXIT -- this ordering is what makes the result
/// deterministic and conservative when a stop and a target both fall inside
/// the same candle's range.
pub fn execute(
    candles: &[Candle],
    t0_ms: i64,
    policy: &RiskPolicy,
    fees: &Fees,
) -> Result<PolicyResult, KernelError> {
    let anchor = match anchor_index(candles, t0_ms) {
        Some(i) => i,
        None => return Ok(PolicyResult::no_entry()),
    };

    let horizon = &candles[anchor..];
    validate_series(horizon).map_err(|(i, reason)| KernelError::MalformedCandle {
        call_id: None,
        reason: format!("candle at offset {} from anchor: {}", i, reason),
    })?;

    let entry_candle = horizon[0];
    let entry_px = entry_candle.open;
    let entry_ts_ms = entry_candle.ts_ms();
    if !entry_px.is_finite() || entry_px <= 0.0 {
        return Err(KernelError::MalformedCandle {
            call_id: None,
            reason: format!("anchor candle open {} is not a usable entry price", entry_px),
        });
    }

    let (mut legs, exit_ts_ms, exit_reason, exit_relative_idx) = match policy {
        RiskPolicy::Combo { policies } => {
            run_combo(policies, entry_px, entry_ts_ms, horizon)
        }
        _ => run_single(policy, entry_px, entry_ts_ms, horizon),
    };

    let (exit_ts_ms, exit_reason, exit_relative_idx) = match exit_ts_ms {
        Some(ts) => (ts, exit_reason.expect("exit_reason set alongside exit_ts_ms"), exit_relative_idx.unwrap()),
        None => {
            // Ran through every candle without a terminal event: force-close
            // whatever size remains at the last candle's close.
            let last = horizon[horizon.len() - 1];
            let filled: f64 = legs.iter().map(|(_, fraction)| fraction).sum();
            let remaining = (1.0 - filled).max(0.0);
            if remaining > 1e-9 {
                legs.push((last.close, remaining));
            }
            (last.ts_ms(), ExitReason::EndOfData, horizon.len() - 1)
        }
    };

    let max_high = horizon.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let min_low_since_entry = horizon[..=exit_relative_idx]
        .iter()
        .map(|c| c.low)
        .fold(f64::INFINITY, f64::min);

    let total_size: f64 = legs.iter().map(|(_, fraction)| fraction).sum();
    let weighted_exit_px = if total_size > 0.0 {
        legs.iter().map(|(price, fraction)| price * fraction).sum::<f64>() / total_size
    } else {
        entry_px
    };

    let buy_mult = fees.buy_multiplier();
    let sell_mult = fees.sell_multiplier();
    let realized_return_bps =
        (weighted_exit_px * sell_mult - entry_px * buy_mult) / (entry_px * buy_mult) * 10_000.0;

    let max_adverse_excursion_bps = (min_low_since_entry / entry_px - 1.0) * 10_000.0;
    let peak_multiple = max_high / entry_px;
    let tail_capture = if peak_multiple > 0.0 {
        Some((weighted_exit_px / entry_px / peak_multiple).clamp(0.0, 1.0))
    } else {
        None
    };

    Ok(PolicyResult {
        entry_ts_ms: Some(entry_ts_ms),
        entry_px: Some(entry_px),
        exit_ts_ms: Some(exit_ts_ms),
        exit_px: Some(weighted_exit_px),
        realized_return_bps,
        stop_out: exit_reason.is_stop_out(),
        max_adverse_excursion_bps,
        time_exposed_ms: exit_ts_ms - entry_ts_ms,
        tail_capture,
        exit_reason,
    })
}

/// Run a non-`Combo` policy to completion, accumulating every fill leg.
/// Returns `(legs, exit_ts_ms, exit_reason, exit_relative_idx)`, all `None`
/// together if the policy never produced a terminal fill before the data
/// ran out (the caller finalizes with an end-of-data forced exit).
type RunOutcome = (Vec<(f64, f64)>, Option<i64>, Option<ExitReason>, Option<usize>);

fn run_single(policy: &RiskPolicy, entry_px: f64, entry_ts_ms: i64, horizon: &[Candle]) -> RunOutcome {
    let mut runtime = PolicyRuntime::new(policy, entry_px);
    let mut legs = vec![];
    for (i, c) in horizon.iter().enumerate() {
        let fills = tick(&mut runtime, policy, entry_px, entry_ts_ms, c);
        let mut terminal_reason = None;
        for f in &fills {
            legs.push((f.price, f.fraction));
            if f.terminal {
                terminal_reason = Some(f.reason.clone());
            }
        }
        if let Some(reason) = terminal_reason {
            return (legs, Some(c.ts_ms()), Some(reason), Some(i));
        }
    }
    (legs, None, None, None)
}

fn run_combo(
    policies: &[RiskPolicy],
    entry_px: f64,
    entry_ts_ms: i64,
    horizon: &[Candle],
) -> RunOutcome {
    let mut best: Option<(usize, usize, f64, ExitReason)> = None;
    for (pidx, inner) in policies.iter().enumerate() {
        if let Some((cidx, fill)) = first_fill_event(inner, entry_px, entry_ts_ms, horizon) {
            let better = match &best {
                None => true,
                Some((bcidx, bpidx, ..)) => (cidx, pidx) < (*bcidx, *bpidx),
            };
            if better {
                best = Some((cidx, pidx, fill.price, fill.reason));
            }
        }
    }

    match best {
        Some((cidx, pidx, price, inner_reason)) => {
            let reason = ExitReason::Combo {
                inner_index: pidx,
                inner_reason: Box::new(inner_reason),
            };
            (
                vec![(price, 1.0)],
                Some(horizon[cidx].ts_ms()),
                Some(reason),
                Some(cidx),
            )
        }
        None => (vec![], None, None, None),
    }
}

/// Id of the policy that produced a given result, for logging. Computing it
/// again here (rather than threading it through `execute`) keeps `execute`'s
/// signature matching the pure four-argument contract callers depend on.
pub fn describe(policy: &RiskPolicy) -> String {
    policy_id(policy)
}
