use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    TimeBased,
    CallerBased,
    Random,
}

/// Eagerly validated at construction; a `SplitConfig` reaching `split` is
/// always safe to apply.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSplitConfig")]
pub struct SplitConfig {
    pub strategy: SplitStrategy,
    pub train_fraction: f64,
    /// Only consulted for `SplitStrategy::Random`. `None` falls back to a
    /// fixed deterministic seed of `0` -- still reproducible, just not
    /// caller-chosen.
    pub random_seed: Option<u64>,
}

impl SplitConfig {
    pub fn new(strategy: SplitStrategy, train_fraction: f64, random_seed: Option<u64>) -> Result<Self, bt_errors::KernelError> {
        if !train_fraction.is_finite() || train_fraction <= 0.0 || train_fraction >= 1.0 {
            return Err(bt_errors::KernelError::InvalidInput {
                field: "train_fraction".to_string(),
                reason: format!("must be in (0,1), got {}", train_fraction),
            });
        }
        Ok(Self {
            strategy,
            train_fraction,
            random_seed,
        })
    }
}

/// Deserialization shadow for `SplitConfig`: lets `serde` parse the same
/// field shape while still routing through the validating constructor, so a
/// `SplitConfig` read from JSON config is just as safe to apply as one
/// built in code (spec §7: invalid `train_fraction` is raised eagerly).
#[derive(Deserialize)]
struct RawSplitConfig {
    strategy: SplitStrategy,
    train_fraction: f64,
    #[serde(default)]
    random_seed: Option<u64>,
}

impl std::convert::TryFrom<RawSplitConfig> for SplitConfig {
    type Error = bt_errors::KernelError;

    fn try_from(raw: RawSplitConfig) -> Result<Self, Self::Error> {
        SplitConfig::new(raw.strategy, raw.train_fraction, raw.random_seed)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum SplitMetadata {
    TimeBased {
        train_range_ms: (i64, i64),
        validation_range_ms: (i64, i64),
    },
    CallerBased {
        train_callers: Vec<String>,
        validation_callers: Vec<String>,
    },
    Random {
        seed: u64,
    },
}

/// Train/validation partition of a call set. Both sides preserve the
/// original `Call` values verbatim (no mutation, no re-derivation).
#[derive(Clone, Debug, PartialEq)]
pub struct SplitResult<'a> {
    pub train: Vec<&'a bt_candle::Call>,
    pub validation: Vec<&'a bt_candle::Call>,
    pub metadata: SplitMetadata,
}
