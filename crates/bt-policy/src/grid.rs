use bt_errors::KernelError;

use crate::construct;
use crate::types::{LadderLevel, RiskPolicy};

/// Cartesian grid of `FixedStop` parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedStopGrid {
    pub stop_pcts: Vec<f64>,
    pub take_profit_pcts: Vec<Option<f64>>,
}

impl FixedStopGrid {
    pub fn generate(&self) -> Result<Vec<RiskPolicy>, KernelError> {
        let mut out = Vec::with_capacity(self.stop_pcts.len() * self.take_profit_pcts.len());
        for &stop_pct in &self.stop_pcts {
            for &tp in &self.take_profit_pcts {
                out.push(construct::fixed_stop(stop_pct, tp)?);
            }
        }
        Ok(out)
    }
}

/// Cartesian grid of `TimeStop` parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeStopGrid {
    pub max_hold_ms_values: Vec<i64>,
    pub take_profit_pcts: Vec<Option<f64>>,
}

impl TimeStopGrid {
    pub fn generate(&self) -> Result<Vec<RiskPolicy>, KernelError> {
        let mut out = Vec::with_capacity(self.max_hold_ms_values.len() * self.take_profit_pcts.len());
        for &max_hold_ms in &self.max_hold_ms_values {
            for &tp in &self.take_profit_pcts {
                out.push(construct::time_stop(max_hold_ms, tp)?);
            }
        }
        Ok(out)
    }
}

/// Cartesian grid of `TrailingStop` parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailingStopGrid {
    pub activation_pcts: Vec<f64>,
    pub trail_pcts: Vec<f64>,
    pub hard_stop_pcts: Vec<Option<f64>>,
}

impl TrailingStopGrid {
    pub fn generate(&self) -> Result<Vec<RiskPolicy>, KernelError> {
        let mut out = Vec::with_capacity(
            self.activation_pcts.len() * self.trail_pcts.len() * self.hard_stop_pcts.len(),
        );
        for &act in &self.activation_pcts {
            for &trail in &self.trail_pcts {
                for &hard in &self.hard_stop_pcts {
                    out.push(construct::trailing_stop(act, trail, hard)?);
                }
            }
        }
        Ok(out)
    }
}

/// Cartesian grid of `Ladder` parameters: each entry in `level_sets` is one
/// complete set of levels to try, combined with every `stop_pcts` value.
#[derive(Clone, Debug, PartialEq)]
pub struct LadderGrid {
    pub level_sets: Vec<Vec<LadderLevel>>,
    pub stop_pcts: Vec<Option<f64>>,
}

impl LadderGrid {
    pub fn generate(&self) -> Result<Vec<RiskPolicy>, KernelError> {
        let mut out = Vec::with_capacity(self.level_sets.len() * self.stop_pcts.len());
        for levels in &self.level_sets {
            for &stop_pct in &self.stop_pcts {
                out.push(construct::ladder(levels.clone(), stop_pct)?);
            }
        }
        Ok(out)
    }
}

/// Build the cartesian product of `Combo { policies: [a, b] }` from two
/// already-generated sets of non-combo policies. Used by the optimizer to
/// generate protect-then-ride compositions (e.g. ladder + trailing) without
/// hand-writing the combination logic at the call site.
pub fn combo_pairs(
    firsts: &[RiskPolicy],
    seconds: &[RiskPolicy],
) -> Result<Vec<RiskPolicy>, KernelError> {
    let mut out = Vec::with_capacity(firsts.len() * seconds.len());
    for a in firsts {
        for b in seconds {
            out.push(construct::combo(vec![a.clone(), b.clone()])?);
        }
    }
    Ok(out)
}
