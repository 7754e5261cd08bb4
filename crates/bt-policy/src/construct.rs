use bt_errors::KernelError;

use crate::id::policy_id;
use crate::types::{LadderLevel, RiskPolicy};

const FRACTION_SUM_EPS: f64 = 1e-9;

fn invalid(policy: &RiskPolicy, reason: impl Into<String>) -> KernelError {
    KernelError::InvalidPolicy {
        policy_id: policy_id(policy),
        reason: reason.into(),
    }
}

fn validate(policy: &RiskPolicy) -> Result<(), String> {
    match policy {
        RiskPolicy::FixedStop {
            stop_pct,
            take_profit_pct,
        } => {
            if !stop_pct.is_finite() || *stop_pct <= 0.0 || *stop_pct > 1.0 {
                return Err(format!("stop_pct must be in (0,1], got {}", stop_pct));
            }
            validate_opt_positive("take_profit_pct", *take_profit_pct)?;
        }
        RiskPolicy::TimeStop {
            max_hold_ms,
            take_profit_pct,
        } => {
            if *max_hold_ms <= 0 {
                return Err(format!("max_hold_ms must be > 0, got {}", max_hold_ms));
            }
            validate_opt_positive("take_profit_pct", *take_profit_pct)?;
        }
        RiskPolicy::TrailingStop {
            activation_pct,
            trail_pct,
            hard_stop_pct,
        } => {
            if !activation_pct.is_finite() || *activation_pct < 0.0 {
                return Err(format!(
                    "activation_pct must be >= 0, got {}",
                    activation_pct
                ));
            }
            if !trail_pct.is_finite() || *trail_pct <= 0.0 || *trail_pct > 1.0 {
                return Err(format!("trail_pct must be in (0,1], got {}", trail_pct));
            }
            validate_opt_positive("hard_stop_pct", *hard_stop_pct)?;
        }
        RiskPolicy::Ladder { levels, stop_pct } => {
            if levels.is_empty() {
                return Err("ladder must have at least one level".to_string());
            }
            let mut prev_multiple = f64::NEG_INFINITY;
            let mut fraction_sum = 0.0;
            for (i, level) in levels.iter().enumerate() {
                if !level.multiple.is_finite() || level.multiple <= 0.0 {
                    return Err(format!(
                        "level {} multiple must be > 0, got {}",
                        i, level.multiple
                    ));
                }
                if level.multiple <= prev_multiple {
                    return Err(format!(
                        "level {} multiple {} does not strictly increase past {}",
                        i, level.multiple, prev_multiple
                    ));
                }
                if !level.fraction.is_finite() || level.fraction <= 0.0 {
                    return Err(format!(
                        "level {} fraction must be > 0, got {}",
                        i, level.fraction
                    ));
                }
                prev_multiple = level.multiple;
                fraction_sum += level.fraction;
            }
            if fraction_sum > 1.0 + FRACTION_SUM_EPS {
                return Err(format!(
                    "ladder fractions sum to {}, must be <= 1",
                    fraction_sum
                ));
            }
            validate_opt_positive("stop_pct", *stop_pct)?;
        }
        RiskPolicy::Combo { policies } => {
            if policies.is_empty() {
                return Err("combo must contain at least one inner policy".to_string());
            }
            for (i, inner) in policies.iter().enumerate() {
                if inner.is_combo() {
                    return Err(format!(
                        "combo leg {} is itself a Combo; nesting is not allowed",
                        i
                    ));
                }
                validate(inner)?;
            }
        }
    }
    Ok(())
}

fn validate_opt_positive(field: &str, value: Option<f64>) -> Result<(), String> {
    if let Some(v) = value {
        if !v.is_finite() || v <= 0.0 {
            return Err(format!("{} must be > 0 when set, got {}", field, v));
        }
    }
    Ok(())
}

pub fn fixed_stop(stop_pct: f64, take_profit_pct: Option<f64>) -> Result<RiskPolicy, KernelError> {
    let policy = RiskPolicy::FixedStop {
        stop_pct,
        take_profit_pct,
    };
    validate(&policy).map_err(|r| invalid(&policy, r))?;
    Ok(policy)
}

pub fn time_stop(max_hold_ms: i64, take_profit_pct: Option<f64>) -> Result<RiskPolicy, KernelError> {
    let policy = RiskPolicy::TimeStop {
        max_hold_ms,
        take_profit_pct,
    };
    validate(&policy).map_err(|r| invalid(&policy, r))?;
    Ok(policy)
}

pub fn trailing_stop(
    activation_pct: f64,
    trail_pct: f64,
    hard_stop_pct: Option<f64>,
) -> Result<RiskPolicy, KernelError> {
    let policy = RiskPolicy::TrailingStop {
        activation_pct,
        trail_pct,
        hard_stop_pct,
    };
    validate(&policy).map_err(|r| invalid(&policy, r))?;
    Ok(policy)
}

pub fn ladder(levels: Vec<LadderLevel>, stop_pct: Option<f64>) -> Result<RiskPolicy, KernelError> {
    let policy = RiskPolicy::Ladder { levels, stop_pct };
    validate(&policy).map_err(|r| invalid(&policy, r))?;
    Ok(policy)
}

pub fn combo(policies: Vec<RiskPolicy>) -> Result<RiskPolicy, KernelError> {
    let policy = RiskPolicy::Combo { policies };
    validate(&policy).map_err(|r| invalid(&policy, r))?;
    Ok(policy)
}
