//! Fleet Diagnostics - Main Entry Point
//!
//! Usage: fleet-diagnostics <table.json>
//!
//! The input is a JSON document `{"columns": [...], "rows": [[...], ...]}`.
//! The report is written to stdout as JSON; logs go to stderr.

use anyhow::Context;
use diagnostics::{init_logging, DiagnosticsEngine, EngineConfig, RawTable};
use std::path::PathBuf;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os("FLEET_DIAG_CONFIG").map(PathBuf::from);
    let config = EngineConfig::load(config_path.as_deref())?;
    init_logging(&config.logging)?;

    info!("=== Fleet Diagnostics v{} ===", env!("CARGO_PKG_VERSION"));

    let input = std::env::args()
        .nth(1)
        .context("usage: fleet-diagnostics <table.json>")?;
    let text = std::fs::read_to_string(&input).with_context(|| format!("reading {}", input))?;
    let raw: RawTable =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", input))?;

    let engine = DiagnosticsEngine::new(&config)?;
    let report = engine.analyze_raw(&raw)?;

    println!("{}", report.to_json()?);
    Ok(())
}
