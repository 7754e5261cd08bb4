//! bt-cli entry point.
//!
//! Loads a JSON fixture of calls + candle series, optionally a JSON
//! `OptimizerConfig` override, runs the per-caller grid search, and prints
//! the truth rows, policy result rows, and optimization summary to stdout as
//! three separate JSON documents. Truth and policy rows are never
//! commingled in one array.

mod fixture;
mod rows;

use anyhow::{Context, Result};
use clap::Parser;
use uuid::Uuid;

use bt_metrics::{compute_path_metrics, PathMetricsOptions};
use bt_optimizer::optimize_per_caller;

use rows::{PolicyResultRow, TruthRow};

#[derive(Parser)]
#[command(name = "bt-cli")]
#[command(about = "Token-call policy backtest kernel: fixture in, scored policies out")]
struct Cli {
    /// Path to a JSON fixture: `{ "calls": [...], "candles_by_call": {...} }`.
    #[arg(long)]
    fixture: String,

    /// Optional JSON `OptimizerConfig` override. Defaults are used if absent.
    #[arg(long)]
    config: Option<String>,

    /// Candle interval label carried through to the truth rows verbatim;
    /// the kernel itself is interval-agnostic.
    #[arg(long, default_value = "1m")]
    interval: String,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let run_id = Uuid::new_v4().to_string();

    let fixture = fixture::load_fixture(&cli.fixture)?;
    let config = fixture::load_config(cli.config.as_deref())?;

    let path_metrics_opts = PathMetricsOptions::default();
    let mut truth_rows = Vec::with_capacity(fixture.calls.len());
    for call in &fixture.calls {
        let candles = fixture
            .candles_by_call
            .get(&call.id)
            .with_context(|| format!("fixture missing candles for call {}", call.id))?;
        let metrics = compute_path_metrics(&call.id, candles, call.t0_ms(), &path_metrics_opts)
            .with_context(|| format!("computing path metrics for call {}", call.id))?;
        truth_rows.push(TruthRow::new(&run_id, call, &cli.interval, &metrics));
    }

    let per_caller = optimize_per_caller(&fixture.calls, &fixture.candles_by_call, &config)
        .context("running optimizer")?;

    // Demonstrate the result-row contract by re-executing each caller's
    // selected best policy against that same caller's own calls.
    let mut policy_result_rows = Vec::new();
    for (caller, result) in &per_caller {
        let Some(best) = &result.best_policy else {
            continue;
        };
        for call in fixture.calls.iter().filter(|c| &c.caller == caller) {
            let candles = match fixture.candles_by_call.get(&call.id) {
                Some(c) => c,
                None => continue,
            };
            let exec = bt_engine::execute(candles, call.t0_ms(), &best.policy, &config.fees)
                .with_context(|| format!("re-executing best policy against call {}", call.id))?;
            policy_result_rows.push(PolicyResultRow::new(&run_id, &best.policy_id, call, &exec));
        }
    }

    println!("{}", serde_json::to_string_pretty(&truth_rows)?);
    println!("{}", serde_json::to_string_pretty(&policy_result_rows)?);
    println!("{}", serde_json::to_string_pretty(&per_caller)?);

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
