use serde::{Deserialize, Serialize};

use crate::candle::to_ms;

/// Chain a call's token lives on. `Other` is an explicit escape hatch rather
/// than guessing an exhaustive list of chains the caller corpus might cover.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chain {
    Solana,
    Ethereum,
    Base,
    Bsc,
    Arbitrum,
    Polygon,
    Other(String),
}

/// A timestamped alert: a caller announcing a token at `created_at_ms`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Opaque, caller-assigned identifier. Unique within one run.
    pub id: String,
    pub caller: String,
    pub token_address: String,
    pub chain: Chain,
    pub created_at_ms: i64,
    pub price_at_alert: Option<f64>,
}

impl Call {
    pub fn new(
        id: impl Into<String>,
        caller: impl Into<String>,
        token_address: impl Into<String>,
        chain: Chain,
        created_at_ms: i64,
        price_at_alert: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            caller: caller.into(),
            token_address: token_address.into(),
            chain,
            created_at_ms,
            price_at_alert,
        }
    }

    /// Build a `Call` from a `created_at` expressed in epoch seconds,
    /// normalizing to milliseconds at this single ingestion boundary.
    pub fn from_seconds(
        id: impl Into<String>,
        caller: impl Into<String>,
        token_address: impl Into<String>,
        chain: Chain,
        created_at_s: i64,
        price_at_alert: Option<f64>,
    ) -> Self {
        Self::new(
            id,
            caller,
            token_address,
            chain,
            to_ms(created_at_s),
            price_at_alert,
        )
    }

    /// `t0_ms` as used by the metrics computer and execution engine: the
    /// call's own alert timestamp.
    pub fn t0_ms(&self) -> i64 {
        self.created_at_ms
    }
}
