//! CPAMM scenario runner
//!
//! Loads a TOML scenario, runs it against the in-memory ledger and prints a
//! JSON report. `cpamm-sim --init [PATH]` writes the reference scenario.

use anyhow::{bail, Context, Result};
use cpamm_sim::{run, Scenario};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("--init") {
        let path = args.get(2).map_or("scenario.toml", String::as_str);
        return Scenario::write_default(path);
    }

    let path = Scenario::path();
    let scenario = Scenario::load(&path).unwrap_or_else(|e| {
        log::warn!("{:#}; running the reference scenario", e);
        Scenario::reference()
    });

    log::info!(
        "Running scenario: {} pools, {} steps",
        scenario.pools.len(),
        scenario.steps.len()
    );

    let (_, report) = run(&scenario).context("Scenario setup failed")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    let mismatches = report.mismatches().count();
    if mismatches > 0 {
        bail!("{} step(s) did not match their expected outcome", mismatches);
    }
    log::info!("All {} steps matched", report.steps.len());
    Ok(())
}
