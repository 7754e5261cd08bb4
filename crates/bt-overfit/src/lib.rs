//! bt-overfit
//!
//! Overfitting Detector (C7): compares a policy's train score against its
//! validation score and classifies the gap into a severity band. Pure,
//! synchronous, no dependency on how the scores were produced.

mod compute;
mod types;

pub use compute::detect_overfitting;
pub use types::{OverfitConfig, OverfitReport, OverfitSeverity};
