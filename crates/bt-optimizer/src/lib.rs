//! bt-optimizer
//!
//! Policy Optimizer (C8): per-caller grid search over the policy space,
//! train/validation splitting, and overfitting-aware best-policy selection.
//! The (policy, call) matrix is evaluated via a `rayon` fan-out (spec §5);
//! every reduction into a policy's score set runs on the calling thread
//! after the fan-out completes, so worker completion order never affects
//! the final ranking.

mod grid;
mod optimize;
mod profile;
mod types;

pub use grid::{generate_grid, PolicyGridConfig};
pub use optimize::{optimize, optimize_per_caller};
pub use profile::is_high_multiple_caller;
pub use types::{
    EvaluatedPolicy, HighMultipleConfig, OptimalPolicy, OptimizationResult, OptimizerConfig,
    PolicyTypesEnabled,
};
