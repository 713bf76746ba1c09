//! CLI wiring for daxpy-bench.

use crate::config::BenchConfig;
use crate::driver::ReportDriver;
use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use tracing::info;

/// Validate and time reference vs SIMD DAXPY kernels.
///
/// Runs a fixed verification example, then benchmarks vectors of 2^20, 2^24
/// and 2^28 doubles. Set RUST_LOG=info for per-kernel throughput on stderr.
#[derive(Parser, Debug)]
#[command(name = "daxpy-bench", version)]
pub struct Cli {}

pub fn run_cli(_cli: Cli) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let driver = ReportDriver::new(BenchConfig::default())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = driver.run(&mut out)?;
    out.flush()?;

    info!(
        verification_passed = summary.verification.passed(),
        sizes_completed = summary.sizes.iter().filter(|s| s.is_completed()).count(),
        sizes_total = summary.sizes.len(),
        "report finished"
    );
    Ok(())
}
