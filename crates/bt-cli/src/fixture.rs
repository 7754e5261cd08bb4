use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use bt_candle::{Call, Candle};
use bt_optimizer::OptimizerConfig;

/// The input fixture a collaborator supplies: an ordered set of calls and,
/// for each call's `id`, its candle series (spec §6 "Candle provider" /
/// "Call source", realized here as one in-process JSON document instead of
/// two network services).
#[derive(Deserialize)]
pub struct Fixture {
    pub calls: Vec<Call>,
    pub candles_by_call: HashMap<String, Vec<Candle>>,
}

pub fn load_fixture(path: &str) -> Result<Fixture> {
    let raw = fs::read_to_string(path).with_context(|| format!("read fixture: {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parse fixture json: {path}"))
}

pub fn load_config(path: Option<&str>) -> Result<OptimizerConfig> {
    match path {
        None => Ok(OptimizerConfig::default()),
        Some(p) if !Path::new(p).exists() => {
            anyhow::bail!("config file not found: {p}")
        }
        Some(p) => {
            let raw = fs::read_to_string(p).with_context(|| format!("read config: {p}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parse config json: {p}"))
        }
    }
}
