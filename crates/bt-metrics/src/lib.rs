//! bt-metrics
//!
//! Path-Metrics Computer (C2): the call's "truth" -- peak multiple, first
//! touch of 2x/3x/4x, drawdowns, activation latency. Pure, single-pass over
//! candles from the anchor index. No clocks, no RNG, no I/O.

mod compute;
mod types;

pub use compute::compute_path_metrics;
pub use types::{PathMetrics, PathMetricsOptions};
