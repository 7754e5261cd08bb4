use bt_candle::Candle;
use bt_policy::{LadderLevel, RiskPolicy};

use crate::types::ExitReason;

const SIZE_EPS: f64 = 1e-9;

/// One realized fill within a policy run.
#[derive(Clone, Debug)]
pub(crate) struct Fill {
    pub price: f64,
    pub fraction: f64,
    pub reason: ExitReason,
    /// True if the policy considers the position fully closed after this fill.
    pub terminal: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct TrailingState {
    activated: bool,
    watermark: f64,
    stop: Option<f64>,
}

impl TrailingState {
    fn new(hard_stop_pct: Option<f64>, entry_px: f64) -> Self {
        Self {
            activated: false,
            watermark: f64::NEG_INFINITY,
            stop: hard_stop_pct.map(|h| entry_px * (1.0 - h)),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct LadderState {
    next_level_idx: usize,
    size_left: f64,
}

impl LadderState {
    fn new() -> Self {
        Self {
            next_level_idx: 0,
            size_left: 1.0,
        }
    }
}

/// Mutable per-candle state carried across a single run of one (non-Combo)
/// policy. `FixedStop`/`TimeStop` need no carried state beyond the constant
/// entry price and policy parameters.
pub(crate) enum PolicyRuntime {
    Fixed,
    Time,
    Trailing(TrailingState),
    Ladder(LadderState),
}

impl PolicyRuntime {
    pub fn new(policy: &RiskPolicy, entry_px: f64) -> Self {
        match policy {
            RiskPolicy::FixedStop { .. } => PolicyRuntime::Fixed,
            RiskPolicy::TimeStop { .. } => PolicyRuntime::Time,
            RiskPolicy::TrailingStop { hard_stop_pct, .. } => {
                PolicyRuntime::Trailing(TrailingState::new(*hard_stop_pct, entry_px))
            }
            RiskPolicy::Ladder { .. } => PolicyRuntime::Ladder(LadderState::new()),
            RiskPolicy::Combo { .. } => {
                unreachable!("PolicyRuntime is only constructed for non-Combo leaves")
            }
        }
    }
}

/// Advance one policy's state by one candle, STOP-first then TARGETS then
/// TIME-EXIT within the candle. Returns every fill realized on this candle,
/// in trigger order; empty if the candle produced no event.
pub(crate) fn tick(
    runtime: &mut PolicyRuntime,
    policy: &RiskPolicy,
    entry_px: f64,
    entry_ts_ms: i64,
    candle: &Candle,
) -> Vec<Fill> {
    match (runtime, policy) {
        (
            PolicyRuntime::Fixed,
            RiskPolicy::FixedStop {
                stop_pct,
                take_profit_pct,
            },
        ) => tick_fixed(entry_px, *stop_pct, *take_profit_pct, candle),
        (
            PolicyRuntime::Time,
            RiskPolicy::TimeStop {
                max_hold_ms,
                take_profit_pct,
            },
        ) => tick_time(entry_px, entry_ts_ms, *max_hold_ms, *take_profit_pct, candle),
        (
            PolicyRuntime::Trailing(state),
            RiskPolicy::TrailingStop {
                activation_pct,
                trail_pct,
                hard_stop_pct,
            },
        ) => tick_trailing(
            state,
            entry_px,
            *activation_pct,
            *trail_pct,
            *hard_stop_pct,
            candle,
        ),
        (PolicyRuntime::Ladder(state), RiskPolicy::Ladder { levels, stop_pct }) => {
            tick_ladder(state, entry_px, levels, *stop_pct, candle)
        }
        _ => unreachable!("PolicyRuntime variant does not match policy kind"),
    }
}

fn tick_fixed(
    entry_px: f64,
    stop_pct: f64,
    take_profit_pct: Option<f64>,
    candle: &Candle,
) -> Vec<Fill> {
    let stop_price = entry_px * (1.0 - stop_pct);
    if candle.low <= stop_price {
        return vec![Fill {
            price: stop_price,
            fraction: 1.0,
            reason: ExitReason::StopLoss,
            terminal: true,
        }];
    }
    if let Some(tp) = take_profit_pct {
        let tp_price = entry_px * (1.0 + tp);
        if candle.high >= tp_price {
            return vec![Fill {
                price: tp_price,
                fraction: 1.0,
                reason: ExitReason::TakeProfit,
                terminal: true,
            }];
        }
    }
    vec![]
}

fn tick_time(
    entry_px: f64,
    entry_ts_ms: i64,
    max_hold_ms: i64,
    take_profit_pct: Option<f64>,
    candle: &Candle,
) -> Vec<Fill> {
    if let Some(tp) = take_profit_pct {
        let tp_price = entry_px * (1.0 + tp);
        if candle.high >= tp_price {
            return vec![Fill {
                price: tp_price,
                fraction: 1.0,
                reason: ExitReason::TakeProfit,
                terminal: true,
            }];
        }
    }
    if candle.ts_ms() >= entry_ts_ms + max_hold_ms {
        return vec![Fill {
            price: candle.open,
            fraction: 1.0,
            reason: ExitReason::TimeStop,
            terminal: true,
        }];
    }
    vec![]
}

fn tick_trailing(
    state: &mut TrailingState,
    entry_px: f64,
    activation_pct: f64,
    trail_pct: f64,
    hard_stop_pct: Option<f64>,
    candle: &Candle,
) -> Vec<Fill> {
    if let Some(stop_price) = state.stop {
        if candle.low <= stop_price {
            return vec![Fill {
                price: stop_price,
                fraction: 1.0,
                reason: ExitReason::TrailingStop,
                terminal: true,
            }];
        }
    }

    if !state.activated {
        if candle.high >= entry_px * (1.0 + activation_pct) {
            state.activated = true;
            state.watermark = candle.high;
        }
    } else {
        state.watermark = state.watermark.max(candle.high);
    }

    if state.activated {
        let trailing_stop = state.watermark * (1.0 - trail_pct);
        let mut candidate = trailing_stop;
        if let Some(h) = hard_stop_pct {
            candidate = candidate.max(entry_px * (1.0 - h));
        }
        // Break-even: once activated, the stop may be raised to entry but never lowered.
        candidate = candidate.max(entry_px);
        state.stop = Some(match state.stop {
            Some(s) => s.max(candidate),
            None => candidate,
        });
    }

    vec![]
}

fn tick_ladder(
    state: &mut LadderState,
    entry_px: f64,
    levels: &[LadderLevel],
    stop_pct: Option<f64>,
    candle: &Candle,
) -> Vec<Fill> {
    if state.size_left <= SIZE_EPS {
        return vec![];
    }

    if let Some(sp) = stop_pct {
        let stop_price = entry_px * (1.0 - sp);
        if candle.low <= stop_price {
            let remaining = state.size_left;
            state.size_left = 0.0;
            return vec![Fill {
                price: stop_price,
                fraction: remaining,
                reason: ExitReason::StopLoss,
                terminal: true,
            }];
        }
    }

    let mut fills = vec![];
    while state.next_level_idx < levels.len() && state.size_left > SIZE_EPS {
        let level = levels[state.next_level_idx];
        let trigger_price = entry_px * level.multiple;
        if candle.high < trigger_price {
            break;
        }
        let realized = level.fraction.min(state.size_left);
        let level_idx = state.next_level_idx;
        state.size_left -= realized;
        state.next_level_idx += 1;
        let terminal = state.size_left <= SIZE_EPS;
        fills.push(Fill {
            price: trigger_price,
            fraction: realized,
            reason: if terminal {
                ExitReason::LadderDone
            } else {
                ExitReason::LadderLeg {
                    level_index: level_idx,
                }
            },
            terminal,
        });
    }
    fills
}

/// First fill a policy would realize, whatever candle it falls on -- used by
/// `Combo` to find the earliest-triggering inner policy without needing to
/// interleave their independent simulations candle by candle.
pub(crate) fn first_fill_event(
    policy: &RiskPolicy,
    entry_px: f64,
    entry_ts_ms: i64,
    candles: &[Candle],
) -> Option<(usize, Fill)> {
    let mut runtime = PolicyRuntime::new(policy, entry_px);
    for (i, c) in candles.iter().enumerate() {
        let fills = tick(&mut runtime, policy, entry_px, entry_ts_ms, c);
        if let Some(f) = fills.into_iter().next() {
            return Some((i, f));
        }
    }
    None
}
