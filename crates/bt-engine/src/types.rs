use serde::{Deserialize, Serialize, Serializer};

/// Flat per-leg cost model applied symmetrically to entry and exit fills.
/// Both legs of a trade pay the same total rate; `buy_multiplier`/`sell_multiplier`
/// turn that into the price adjustment a fill actually clears at.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fees {
    pub taker_fee_bps: f64,
    pub slippage_bps: f64,
}

impl Fees {
    pub fn new(taker_fee_bps: f64, slippage_bps: f64) -> Self {
        Self {
            taker_fee_bps,
            slippage_bps,
        }
    }

    pub fn zero() -> Self {
        Self {
            taker_fee_bps: 0.0,
            slippage_bps: 0.0,
        }
    }

    pub(crate) fn buy_multiplier(&self) -> f64 {
        1.0 + (self.taker_fee_bps + self.slippage_bps) / 10_000.0
    }

    pub(crate) fn sell_multiplier(&self) -> f64 {
        1.0 - (self.taker_fee_bps + self.slippage_bps) / 10_000.0
    }
}

impl Default for Fees {
    fn default() -> Self {
        Self::zero()
    }
}

/// Why a policy run closed. Combo wraps the winning inner policy's own
/// reason, prefixed with its index in the `policies` list.
#[derive(Clone, Debug, PartialEq)]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    TimeStop,
    TrailingStop,
    LadderDone,
    /// A ladder level fired but did not exhaust the position. Only ever
    /// surfaces as the top-level reason when this leg fired inside a `Combo`
    /// (a standalone ladder keeps running after a partial leg).
    LadderLeg { level_index: usize },
    EndOfData,
    NoEntry,
    Combo {
        inner_index: usize,
        inner_reason: Box<ExitReason>,
    },
}

impl ExitReason {
    /// True if the position closed defensively rather than at a target or
    /// a forced time/data boundary. Used by the scorer's constraint checks.
    pub fn is_stop_out(&self) -> bool {
        match self {
            ExitReason::StopLoss | ExitReason::TrailingStop => true,
            ExitReason::Combo { inner_reason, .. } => inner_reason.is_stop_out(),
            _ => false,
        }
    }

    pub fn canonical_str(&self) -> String {
        match self {
            ExitReason::TakeProfit => "take_profit".to_string(),
            ExitReason::StopLoss => "stop_loss".to_string(),
            ExitReason::TimeStop => "time_stop".to_string(),
            ExitReason::TrailingStop => "trailing_stop".to_string(),
            ExitReason::LadderDone => "ladder_done".to_string(),
            ExitReason::LadderLeg { level_index } => format!("ladder_leg_{}", level_index),
            ExitReason::EndOfData => "end_of_data".to_string(),
            ExitReason::NoEntry => "no_entry".to_string(),
            ExitReason::Combo {
                inner_index,
                inner_reason,
            } => format!("combo_{}:{}", inner_index, inner_reason.canonical_str()),
        }
    }
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical_str())
    }
}

impl Serialize for ExitReason {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.canonical_str())
    }
}

/// The deterministic outcome of simulating one policy against one call's
/// candle series. A pure function of its inputs: same candles, same
/// anchor, same policy, same fees always produce the same `PolicyResult`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolicyResult {
    pub entry_ts_ms: Option<i64>,
    pub entry_px: Option<f64>,
    pub exit_ts_ms: Option<i64>,
    pub exit_px: Option<f64>,
    pub realized_return_bps: f64,
    pub stop_out: bool,
    pub max_adverse_excursion_bps: f64,
    pub time_exposed_ms: i64,
    /// `realized_multiple / peak_multiple` over the full analysis horizon,
    /// clamped to `[0, 1]`. `None` when there was no entry or the horizon's
    /// peak multiple could not be formed.
    pub tail_capture: Option<f64>,
    pub exit_reason: ExitReason,
}

impl PolicyResult {
    pub fn no_entry() -> Self {
        Self {
            entry_ts_ms: None,
            entry_px: None,
            exit_ts_ms: None,
            exit_px: None,
            realized_return_bps: 0.0,
            stop_out: false,
            max_adverse_excursion_bps: 0.0,
            time_exposed_ms: 0,
            tail_capture: None,
            exit_reason: ExitReason::NoEntry,
        }
    }
}
