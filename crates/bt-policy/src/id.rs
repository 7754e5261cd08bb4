use crate::types::RiskPolicy;

/// Fixed decimal representation for floats in canonical ids: deterministic
/// regardless of locale or the platform's default float formatting.
fn fmt_num(x: f64) -> String {
    format!("{:.4}", x)
}

fn fmt_opt_pct(x: Option<f64>) -> String {
    match x {
        Some(v) => fmt_num(v),
        None => "none".to_string(),
    }
}

/// Deterministic canonical string id for a policy (spec §6). Every caller of
/// this function, across logging and storage keys, gets exactly the same
/// string for the same value.
pub fn policy_id(policy: &RiskPolicy) -> String {
    match policy {
        RiskPolicy::FixedStop {
            stop_pct,
            take_profit_pct,
        } => format!(
            "fixed_stop_{}_{}",
            fmt_num(*stop_pct),
            fmt_opt_pct(*take_profit_pct)
        ),
        RiskPolicy::TimeStop {
            max_hold_ms,
            take_profit_pct,
        } => format!(
            "time_stop_{}_{}",
            max_hold_ms,
            fmt_opt_pct(*take_profit_pct)
        ),
        RiskPolicy::TrailingStop {
            activation_pct,
            trail_pct,
            hard_stop_pct,
        } => format!(
            "trailing_{}_{}_{}",
            fmt_num(*activation_pct),
            fmt_num(*trail_pct),
            fmt_opt_pct(*hard_stop_pct)
        ),
        RiskPolicy::Ladder { levels, stop_pct } => {
            let legs: Vec<String> = levels
                .iter()
                .map(|l| format!("{}x{}", fmt_num(l.multiple), fmt_num(l.fraction)))
                .collect();
            format!("ladder_{}_{}", legs.join("_"), fmt_opt_pct(*stop_pct))
        }
        RiskPolicy::Combo { policies } => {
            let inner: Vec<String> = policies.iter().map(policy_id).collect();
            format!("combo_{}", inner.join("+"))
        }
    }
}
