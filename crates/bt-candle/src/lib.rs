//! bt-candle
//!
//! Candle & time primitives (C1): the OHLCV record, the `Call` alert record,
//! and the seconds->milliseconds normalization boundary. Everything above
//! this crate operates in milliseconds exclusively.

mod call;
mod candle;

pub use call::{Call, Chain};
pub use candle::{anchor_index, to_ms, validate_series, Candle};
