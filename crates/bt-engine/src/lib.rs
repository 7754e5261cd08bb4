//! bt-engine
//!
//! Policy Execution Engine (C4): deterministically simulates one exit
//! policy against one call's candle series. STOP-first, then TARGETS, then
//! TIME-EXIT within every candle; forced exit at the last candle's close if
//! the policy never closes on its own.

mod engine;
mod runtime;
mod types;

pub use engine::{describe, execute};
pub use types::{ExitReason, Fees, PolicyResult};
