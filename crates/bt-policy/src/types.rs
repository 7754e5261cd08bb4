use serde::{Deserialize, Serialize};

/// One partial-exit level of a `Ladder` policy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LadderLevel {
    /// Exit trigger, expressed as a multiple of the entry price (e.g. `2.0` = 2x).
    pub multiple: f64,
    /// Fraction of the original position size to exit at this level (0,1].
    pub fraction: f64,
}

impl LadderLevel {
    pub fn new(multiple: f64, fraction: f64) -> Self {
        Self { multiple, fraction }
    }
}

/// A frozen exit policy. Constructed only through the validating
/// constructors in [`crate::construct`] -- every value reachable here has
/// already passed domain validation (ladder fractions sum <= 1, strictly
/// increasing multiples, no nested `Combo`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskPolicy {
    FixedStop {
        stop_pct: f64,
        take_profit_pct: Option<f64>,
    },
    TimeStop {
        max_hold_ms: i64,
        take_profit_pct: Option<f64>,
    },
    TrailingStop {
        activation_pct: f64,
        trail_pct: f64,
        hard_stop_pct: Option<f64>,
    },
    Ladder {
        levels: Vec<LadderLevel>,
        stop_pct: Option<f64>,
    },
    /// First-trigger-wins composition of inner policies. Inner policies must
    /// not themselves be `Combo`.
    Combo { policies: Vec<RiskPolicy> },
}

impl RiskPolicy {
    /// Short discriminant name, used in logging and error messages before a
    /// canonical id can be formed.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RiskPolicy::FixedStop { .. } => "fixed_stop",
            RiskPolicy::TimeStop { .. } => "time_stop",
            RiskPolicy::TrailingStop { .. } => "trailing_stop",
            RiskPolicy::Ladder { .. } => "ladder",
            RiskPolicy::Combo { .. } => "combo",
        }
    }

    pub fn is_combo(&self) -> bool {
        matches!(self, RiskPolicy::Combo { .. })
    }
}
