use bt_candle::{anchor_index, Candle};
use bt_errors::KernelError;

use crate::types::{PathMetrics, PathMetricsOptions};

/// Compute the path-metrics "truth" row for one call.
///
/// Pure function of `(candles, t0_ms, options)` -- bit-for-bit reproducible
/// on re-run (spec invariant 1). A single forward pass from the anchor
/// candle tracks the running low (for `dd_bps`), the running high (for
/// `peak_multiple`), and the first touch of 2x/3x/4x via candle `high`.
///
/// Ordinary absence of data (no anchor candle, or a non-positive but
/// finite `p0`) returns a row of null/NaN fields -- never an error. Only a
/// non-finite `p0` (itself derived from a malformed candle) is raised as
/// `KernelError::InvalidInput`.
pub fn compute_path_metrics(
    call_id: &str,
    candles: &[Candle],
    t0_ms: i64,
    options: &PathMetricsOptions,
) -> Result<PathMetrics, KernelError> {
    let anchor = match anchor_index(candles, t0_ms) {
        Some(i) => i,
        None => return Ok(PathMetrics::absent(call_id, t0_ms, f64::NAN)),
    };

    let p0 = candles[anchor].close;

    if !p0.is_finite() {
        return Err(KernelError::InvalidInput {
            field: "p0".to_string(),
            reason: format!("anchor close is non-finite ({})", p0),
        });
    }

    if p0 <= 0.0 {
        return Ok(PathMetrics::absent(call_id, t0_ms, p0));
    }

    let mut running_min_low = f64::INFINITY;
    let mut prev_min_low = f64::INFINITY;
    let mut running_max_high = f64::NEG_INFINITY;

    let mut hit_2x = false;
    let mut hit_3x = false;
    let mut hit_4x = false;
    let mut t_2x_ms = None;
    let mut t_3x_ms = None;
    let mut t_4x_ms = None;
    let mut dd_to_2x_bps = None;
    let mut alert_to_activity_ms = None;

    let lo_alpha = p0 * (1.0 - options.activity_alpha);
    let hi_alpha = p0 * (1.0 + options.activity_alpha);

    for c in &candles[anchor..] {
        prev_min_low = running_min_low;
        running_min_low = running_min_low.min(c.low);
        running_max_high = running_max_high.max(c.high);

        if !hit_2x && c.high >= p0 * 2.0 {
            hit_2x = true;
            t_2x_ms = Some(c.ts_ms());
            let window_low = if options.dd_to_2x_inclusive {
                running_min_low
            } else {
                prev_min_low
            };
            dd_to_2x_bps = Some(clamp_nonpositive_bps(window_low, p0));
        }
        if !hit_3x && c.high >= p0 * 3.0 {
            hit_3x = true;
            t_3x_ms = Some(c.ts_ms());
        }
        if !hit_4x && c.high >= p0 * 4.0 {
            hit_4x = true;
            t_4x_ms = Some(c.ts_ms());
        }
        if alert_to_activity_ms.is_none() && (c.high >= hi_alpha || c.low <= lo_alpha) {
            alert_to_activity_ms = Some(c.ts_ms() - t0_ms);
        }
    }

    let dd_bps = clamp_nonpositive_bps(running_min_low, p0);
    let peak_multiple = running_max_high / p0;

    Ok(PathMetrics {
        call_id: call_id.to_string(),
        t0_ms,
        p0,
        hit_2x,
        hit_3x,
        hit_4x,
        t_2x_ms,
        t_3x_ms,
        t_4x_ms,
        dd_bps,
        dd_to_2x_bps,
        alert_to_activity_ms,
        peak_multiple,
    })
}

/// `(low / p0 - 1) * 10_000`, clamped to <= 0: a flat or rising price
/// series never reports a positive drawdown.
fn clamp_nonpositive_bps(low: f64, p0: f64) -> f64 {
    let bps = (low / p0 - 1.0) * 10_000.0;
    bps.min(0.0)
}
