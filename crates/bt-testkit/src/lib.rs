//! bt-testkit
//!
//! Shared candle/call fixtures for scenario tests across the workspace.
//! Not published; `dev-dependencies` only.

use anyhow::{Context, Result};
use bt_candle::Candle;
use std::fs;

/// One bar's high/low/close triple; `open` is threaded through automatically
/// as the previous bar's close (or `entry_open` for the first bar), which is
/// how spec scenarios describe price paths.
#[derive(Clone, Copy, Debug)]
pub struct Bar {
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(high: f64, low: f64, close: f64) -> Self {
        Self {
            high,
            low,
            close,
            volume: 1_000.0,
        }
    }
}

/// Build a candle series anchored so that `t0_ms` falls exactly on the
/// first bar. `start_ts_s` is the first candle's close timestamp in
/// seconds; candles are spaced `step_s` apart.
pub fn build_series(entry_open: f64, start_ts_s: i64, step_s: i64, bars: &[Bar]) -> Vec<Candle> {
    let mut out = Vec::with_capacity(bars.len());
    let mut open = entry_open;
    for (i, bar) in bars.iter().enumerate() {
        let ts_s = start_ts_s + step_s * i as i64;
        out.push(Candle::new(ts_s, open, bar.high, bar.low, bar.close, bar.volume));
        open = bar.close;
    }
    out
}

/// The anchor timestamp (ms) of a series built by [`build_series`].
pub fn anchor_ms(start_ts_s: i64) -> i64 {
    bt_candle::to_ms(start_ts_s)
}

pub fn load_candles_json(path: &str) -> Result<Vec<Candle>> {
    let s = fs::read_to_string(path).with_context(|| format!("read candles fixture: {path}"))?;
    let candles: Vec<Candle> = serde_json::from_str(&s).context("parse candles json")?;
    Ok(candles)
}
