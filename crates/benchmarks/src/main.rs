//! Benchmark harness executable for daxpy-bench.

use anyhow::Result;
use clap::Parser;
use daxpybench_harness::cli::{run_cli, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    run_cli(cli)
}
