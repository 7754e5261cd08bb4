//! bt-scorer
//!
//! Policy Scorer (C5): reduces a policy's `PolicyResult` rows to a single
//! `PolicyScore` against configurable hard constraints, and provides the
//! comparison contract the optimizer ranks policies with.

mod compute;
mod percentile;
mod types;

pub use compute::{compare_scores, score_policy};
pub use percentile::{median, percentile as percentile_of, sorted_copy};
pub use types::{
    Constraints, ObjectiveBreakdown, PolicyScore, PrimaryMetric, ScoreMetrics, ScorerOptions,
    TieBreakers, Violations,
};
