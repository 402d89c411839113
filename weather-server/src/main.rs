//! Binary crate for the `weather-server` HTTP service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and environment
//! - Loading provider credentials before serving
//! - Mapping HTTP requests onto the core aggregator

use clap::Parser;

mod cli;
mod routes;
mod telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    telemetry::init();
    cmd.run().await
}
