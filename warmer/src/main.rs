//! Warm the cache from the world database, then compare lookup latency.
//!
//! Takes no arguments; see [`warmer::config`] for the environment variables.
//!
//! Usage:
//!   cargo run --release --bin warm-cache

use anyhow::Context;
use std::process;
use warmer::config::WarmerConfig;
use warmer::context::WarmerContext;
use warmer::report::print_report;

fn run(config: &WarmerConfig) -> anyhow::Result<()> {
    let mut context = WarmerContext::connect(config).context("Failed to open backends")?;

    let written = match context.warm() {
        Ok(report) => report,
        Err(e) => return Err(context.abort(e)).context("Cache warm-up failed"),
    };

    let outcome = match context.benchmark(&config.bench_ids) {
        Ok(outcome) => outcome,
        Err(e) => return Err(context.abort(e)).context("Benchmark failed"),
    };

    context.shutdown().context("Failed to close world database")?;
    print_report(&written, &outcome);
    Ok(())
}

fn main() {
    let config = WarmerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    world_core::initialize_logger(config.log_level, config.log_file.as_deref()).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logger: {}. Exiting.", e);
        process::exit(1);
    });

    log::info!("Starting world cache warmer v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&config) {
        log::error!("{e:#}");
        process::exit(1);
    }
}
