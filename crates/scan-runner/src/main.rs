//! Compliance Scan Runner - Main Entry Point

use clap::Parser;
use scan_runner::{init_logging, Runner, RunnerArgs};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = RunnerArgs::parse();

    init_logging(args.log_level, args.json_logs)?;

    info!("=== Inspection Compliance Scanner v{} ===", env!("CARGO_PKG_VERSION"));

    let runner = Runner::new(args)?;
    runner.run().await
}
