use serde::{Deserialize, Serialize};

/// A single OHLCV candle.
///
/// Candles are chronological with strictly monotonic `ts_s` within one
/// series; gaps between bars are tolerated (no synthetic fill-in is ever
/// performed by this crate).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Candle timestamp, epoch seconds (as stored by the candle provider).
    pub ts_s: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(ts_s: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            ts_s,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Timestamp widened to milliseconds. All downstream modules operate in
    /// milliseconds; this is the single conversion point at candle ingestion.
    pub fn ts_ms(&self) -> i64 {
        to_ms(self.ts_s)
    }

    /// True iff every OHLCV field is finite (no NaN/Inf from a malformed feed).
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}

/// Widen a seconds-resolution timestamp to milliseconds.
///
/// This is the single conversion point the design notes call for: a
/// candle/call timestamp crosses exactly one int64-seconds -> int64-ms
/// boundary, here, and nowhere else.
pub fn to_ms(ts_s: i64) -> i64 {
    ts_s.saturating_mul(1000)
}

/// Find the anchor candle: the first candle with `ts_ms >= t0_ms`.
///
/// Returns `None` if every candle in the slice precedes `t0_ms` (or the
/// slice is empty) -- callers must treat this as "anchor absent", never as
/// an error (spec §4.1).
pub fn anchor_index(candles: &[Candle], t0_ms: i64) -> Option<usize> {
    candles.iter().position(|c| c.ts_ms() >= t0_ms)
}

/// Validate that every candle is finite and timestamps are strictly
/// increasing. Returns the index and message of the first violation found.
pub fn validate_series(candles: &[Candle]) -> Result<(), (usize, String)> {
    let mut prev_ts: Option<i64> = None;
    for (i, c) in candles.iter().enumerate() {
        if !c.is_finite() {
            return Err((i, "non-finite OHLCV value".to_string()));
        }
        if let Some(p) = prev_ts {
            if c.ts_s <= p {
                return Err((i, format!("timestamp {} does not strictly increase past {}", c.ts_s, p)));
            }
        }
        prev_ts = Some(c.ts_s);
    }
    Ok(())
}
