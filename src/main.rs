use anyhow::{Context, Result};
use batch_clearing::{BatchSnapshot, ClearingEngine, EngineConfig, report, utils};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    // Configuration
    let config = EngineConfig::from_env()?;
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("BATCH_FILE").ok())
        .context("usage: batch-clearing <batch.json> (or set BATCH_FILE)")?;

    let snapshot = BatchSnapshot::load(&path).with_context(|| format!("loading {path}"))?;

    tracing::info!(
        path = %path,
        reserve0 = snapshot.reserves.reserve0,
        reserve1 = snapshot.reserves.reserve1,
        intents = snapshot.intents.len(),
        mode = %config.mode,
        "[INIT] batch-clearing starting"
    );

    let engine = ClearingEngine::new(config)?;
    let comparison = report::compare(&engine, snapshot.reserves, &snapshot.intents)?;

    tracing::info!(
        batch_filled = comparison.batch_summary.filled,
        sequential_filled = comparison.sequential_summary.filled,
        "[DONE] batch cleared"
    );

    println!("{}", serde_json::to_string_pretty(&comparison)?);
    Ok(())
}
