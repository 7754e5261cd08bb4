use serde::{Deserialize, Serialize};

/// Options controlling path-metric computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathMetricsOptions {
    /// Fractional move (either direction) from `p0` that counts as
    /// "activity" for `alert_to_activity_ms`. Default 0.10 (10%).
    pub activity_alpha: f64,
    /// Whether the 2x-restricted drawdown window includes the candle that
    /// triggers the 2x touch. Default true (inclusive), per spec §4.
    pub dd_to_2x_inclusive: bool,
}

impl Default for PathMetricsOptions {
    fn default() -> Self {
        Self {
            activity_alpha: 0.10,
            dd_to_2x_inclusive: true,
        }
    }
}

/// The immutable "truth" computed for one call: a deterministic,
/// policy-independent summary of its candle path from the anchor onward.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathMetrics {
    pub call_id: String,
    pub t0_ms: i64,
    /// Close of the anchor candle. `NaN` if no anchor candle exists.
    pub p0: f64,

    pub hit_2x: bool,
    pub hit_3x: bool,
    pub hit_4x: bool,
    pub t_2x_ms: Option<i64>,
    pub t_3x_ms: Option<i64>,
    pub t_4x_ms: Option<i64>,

    /// `(min(low) from anchor onward / p0 - 1) * 10_000`. Always <= 0.
    pub dd_bps: f64,
    /// Same restricted to `[t0, t_2x]`. `None` if 2x was never hit.
    pub dd_to_2x_bps: Option<f64>,
    /// Time to the first candle whose high/low moves `activity_alpha`
    /// fraction away from `p0`, in either direction.
    pub alert_to_activity_ms: Option<i64>,
    /// `max(high) / p0` over the analysis horizon.
    pub peak_multiple: f64,
}

impl PathMetrics {
    /// The "anchor absent" / "p0 non-positive" sentinel row: every derived
    /// field is null/NaN, `p0` carries whatever was actually observed (or
    /// `NaN` if there was no anchor candle at all).
    pub fn absent(call_id: impl Into<String>, t0_ms: i64, p0: f64) -> Self {
        Self {
            call_id: call_id.into(),
            t0_ms,
            p0,
            hit_2x: false,
            hit_3x: false,
            hit_4x: false,
            t_2x_ms: None,
            t_3x_ms: None,
            t_4x_ms: None,
            dd_bps: f64::NAN,
            dd_to_2x_bps: None,
            alert_to_activity_ms: None,
            peak_multiple: f64::NAN,
        }
    }
}
