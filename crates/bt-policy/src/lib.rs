//! bt-policy
//!
//! Policy Model (C3): the five exit-policy variants plus `Combo`, their
//! validating constructors, deterministic canonical ids, and cartesian grid
//! generators. Every `RiskPolicy` reachable outside this crate has already
//! passed construction-time validation.

mod construct;
mod grid;
mod id;
mod types;

pub use construct::{combo, fixed_stop, ladder, time_stop, trailing_stop};
pub use grid::{combo_pairs, FixedStopGrid, LadderGrid, TimeStopGrid, TrailingStopGrid};
pub use id::policy_id;
pub use types::{LadderLevel, RiskPolicy};
