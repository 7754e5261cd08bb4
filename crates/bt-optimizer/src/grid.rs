use bt_errors::KernelError;
use bt_policy::{
    combo_pairs, FixedStopGrid, LadderGrid, LadderLevel, RiskPolicy, TimeStopGrid, TrailingStopGrid,
};

use crate::types::PolicyTypesEnabled;

const HOUR_MS: i64 = 60 * 60 * 1000;

/// The cartesian grids searched for each policy family. Defaults are a
/// modest but representative sweep; callers running a real study override
/// these with their own ranges.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyGridConfig {
    pub fixed_stop: FixedStopGrid,
    pub time_stop: TimeStopGrid,
    pub trailing_stop: TrailingStopGrid,
    pub ladder: LadderGrid,
    /// Ladder level sets tried as the "protect" leg of a non-high-multiple
    /// caller's combo policies (spec §4.6 step 3).
    pub combo_protect_ladders: Vec<Vec<LadderLevel>>,
    pub combo_time_stops_ms: Vec<Option<i64>>,
}

impl Default for PolicyGridConfig {
    fn default() -> Self {
        Self {
            fixed_stop: FixedStopGrid {
                stop_pcts: vec![0.10, 0.15, 0.20, 0.25, 0.30],
                take_profit_pcts: vec![None, Some(0.5), Some(1.0), Some(2.0)],
            },
            time_stop: TimeStopGrid {
                max_hold_ms_values: vec![1 * HOUR_MS, 4 * HOUR_MS, 12 * HOUR_MS, 24 * HOUR_MS],
                take_profit_pcts: vec![None, Some(1.0), Some(2.0)],
            },
            trailing_stop: TrailingStopGrid {
                activation_pcts: vec![0.20, 0.50, 1.00],
                trail_pcts: vec![0.15, 0.20, 0.30],
                hard_stop_pcts: vec![None, Some(0.25), Some(0.40)],
            },
            ladder: LadderGrid {
                level_sets: vec![
                    vec![LadderLevel::new(2.0, 0.5), LadderLevel::new(3.0, 0.5)],
                    vec![
                        LadderLevel::new(2.0, 0.4),
                        LadderLevel::new(3.0, 0.3),
                        LadderLevel::new(4.0, 0.3),
                    ],
                ],
                stop_pcts: vec![None, Some(0.20), Some(0.30)],
            },
            combo_protect_ladders: vec![
                vec![LadderLevel::new(2.0, 0.5), LadderLevel::new(3.0, 0.5)],
                vec![LadderLevel::new(2.0, 0.7)],
            ],
            combo_time_stops_ms: vec![None, Some(24 * HOUR_MS)],
        }
    }
}

/// Generate the full policy grid for one caller partition, per spec §4.6
/// step 3: fixed/time/trailing/ladder are always included (subject to
/// `enabled`); `Combo` compositions (ladder-to-protect + trailing-to-ride,
/// with an optional time stop) are added only for callers whose train-set
/// peak-multiple profile is *not* "high-multiple" -- those callers benefit
/// from riders that protect early gains rather than let them run unguarded.
pub fn generate_grid(
    grid: &PolicyGridConfig,
    enabled: &PolicyTypesEnabled,
    is_high_multiple_caller: bool,
) -> Result<Vec<RiskPolicy>, KernelError> {
    let mut out = Vec::new();

    if enabled.fixed_stop {
        out.extend(grid.fixed_stop.generate()?);
    }
    if enabled.time_stop {
        out.extend(grid.time_stop.generate()?);
    }
    if enabled.trailing_stop {
        out.extend(grid.trailing_stop.generate()?);
    }
    if enabled.ladder {
        out.extend(grid.ladder.generate()?);
    }

    if !is_high_multiple_caller && enabled.ladder && enabled.trailing_stop {
        out.extend(generate_combo_grid(grid)?);
    }

    Ok(out)
}

/// Protect-then-ride compositions: a ladder leg that locks in early gains
/// paired with a trailing rider, optionally bounded by a time stop. The
/// plain protect x rider pairing goes through [`bt_policy::combo_pairs`];
/// the three-leg variant (protect + rider + time stop) can't, since `Combo`
/// forbids nesting and `combo_pairs` only builds two-leg combinations, so
/// it is built directly for each `Some` time-stop bound.
fn generate_combo_grid(grid: &PolicyGridConfig) -> Result<Vec<RiskPolicy>, KernelError> {
    let protects: Vec<RiskPolicy> = grid
        .combo_protect_ladders
        .iter()
        .map(|levels| bt_policy::ladder(levels.clone(), None))
        .collect::<Result<_, _>>()?;
    let riders = grid.trailing_stop.generate()?;

    let mut out = Vec::new();
    for &time_stop_ms in &grid.combo_time_stops_ms {
        match time_stop_ms {
            None => out.extend(combo_pairs(&protects, &riders)?),
            Some(max_hold_ms) => {
                let time_stop = bt_policy::time_stop(max_hold_ms, None)?;
                for protect in &protects {
                    for rider in &riders {
                        out.push(bt_policy::combo(vec![
                            protect.clone(),
                            rider.clone(),
                            time_stop.clone(),
                        ])?);
                    }
                }
            }
        }
    }

    Ok(out)
}
