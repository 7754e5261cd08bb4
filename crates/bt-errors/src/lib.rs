//! bt-errors
//!
//! Shared error type for the backtesting kernel (C2-C6).
//!
//! The kernel is pure and deterministic: construction errors are raised
//! eagerly and carry the offending identifier so the surrounding
//! orchestrator can report precisely (spec §7). Execution and scoring never
//! raise on sparse inputs -- "no_entry", "end_of_data" and the scorer's
//! empty-score sentinel are normal outcomes, not errors.

/// Kernel-wide error kinds.
///
/// `InsufficientData` from spec §7 is intentionally absent here: it is
/// returned as a non-fatal empty `PolicyScore`, never raised.
#[derive(Clone, Debug, PartialEq)]
pub enum KernelError {
    /// Policy construction/validation failure (e.g. ladder fractions sum > 1,
    /// non-increasing ladder multiples, nested Combo).
    InvalidPolicy {
        /// Canonical id of the offending policy, when one could be formed.
        policy_id: String,
        reason: String,
    },
    /// Non-finite OHLCV value or disordered timestamps.
    MalformedCandle {
        /// Call id the candle series belongs to, when known.
        call_id: Option<String>,
        reason: String,
    },
    /// Configuration/input outside its valid domain (train_fraction outside
    /// (0,1), unknown split strategy name, etc).
    InvalidInput { field: String, reason: String },
}

impl core::fmt::Display for KernelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            KernelError::InvalidPolicy { policy_id, reason } => {
                write!(f, "invalid policy '{}': {}", policy_id, reason)
            }
            KernelError::MalformedCandle { call_id, reason } => match call_id {
                Some(id) => write!(f, "malformed candle for call '{}': {}", id, reason),
                None => write!(f, "malformed candle: {}", reason),
            },
            KernelError::InvalidInput { field, reason } => {
                write!(f, "invalid input '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for KernelError {}
