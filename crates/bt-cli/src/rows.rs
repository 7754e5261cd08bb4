use serde::Serialize;

use bt_candle::{Call, Chain};
use bt_engine::PolicyResult;
use bt_metrics::PathMetrics;

/// `path_metrics_rows`: one per (run_id, call_id), truth only. Per spec §6's
/// guardrail, this type and [`PolicyResultRow`] are never serialized into
/// the same array.
#[derive(Serialize)]
pub struct TruthRow {
    pub run_id: String,
    pub call_id: String,
    pub caller_name: String,
    pub mint: String,
    pub chain: Chain,
    pub interval: String,
    pub alert_ts_ms: i64,
    pub t0_ms: i64,
    pub p0: f64,
    pub hit_2x: bool,
    pub hit_3x: bool,
    pub hit_4x: bool,
    pub t_2x_ms: Option<i64>,
    pub t_3x_ms: Option<i64>,
    pub t_4x_ms: Option<i64>,
    pub dd_bps: f64,
    pub dd_to_2x_bps: Option<f64>,
    pub alert_to_activity_ms: Option<i64>,
    pub peak_multiple: f64,
}

impl TruthRow {
    pub fn new(run_id: &str, call: &Call, interval: &str, metrics: &PathMetrics) -> Self {
        Self {
            run_id: run_id.to_string(),
            call_id: call.id.clone(),
            caller_name: call.caller.clone(),
            mint: call.token_address.clone(),
            chain: call.chain.clone(),
            interval: interval.to_string(),
            alert_ts_ms: call.created_at_ms,
            t0_ms: metrics.t0_ms,
            p0: metrics.p0,
            hit_2x: metrics.hit_2x,
            hit_3x: metrics.hit_3x,
            hit_4x: metrics.hit_4x,
            t_2x_ms: metrics.t_2x_ms,
            t_3x_ms: metrics.t_3x_ms,
            t_4x_ms: metrics.t_4x_ms,
            dd_bps: metrics.dd_bps,
            dd_to_2x_bps: metrics.dd_to_2x_bps,
            alert_to_activity_ms: metrics.alert_to_activity_ms,
            peak_multiple: metrics.peak_multiple,
        }
    }
}

/// `policy_results_rows`: one per (run_id, policy_id, call_id).
#[derive(Serialize)]
pub struct PolicyResultRow {
    pub run_id: String,
    pub policy_id: String,
    pub call_id: String,
    pub caller_name: String,
    pub entry_ts_ms: Option<i64>,
    pub entry_px: Option<f64>,
    pub exit_ts_ms: Option<i64>,
    pub exit_px: Option<f64>,
    pub realized_return_bps: f64,
    pub stop_out: bool,
    pub max_adverse_excursion_bps: f64,
    pub time_exposed_ms: i64,
    pub tail_capture: Option<f64>,
    pub exit_reason: String,
}

impl PolicyResultRow {
    pub fn new(run_id: &str, policy_id: &str, call: &Call, result: &PolicyResult) -> Self {
        Self {
            run_id: run_id.to_string(),
            policy_id: policy_id.to_string(),
            call_id: call.id.clone(),
            caller_name: call.caller.clone(),
            entry_ts_ms: result.entry_ts_ms,
            entry_px: result.entry_px,
            exit_ts_ms: result.exit_ts_ms,
            exit_px: result.exit_px,
            realized_return_bps: result.realized_return_bps,
            stop_out: result.stop_out,
            max_adverse_excursion_bps: result.max_adverse_excursion_bps,
            time_exposed_ms: result.time_exposed_ms,
            tail_capture: result.tail_capture,
            exit_reason: result.exit_reason.canonical_str(),
        }
    }
}
