//! # ctrlsim
//!
//! Entry point for the `ctrlsim` binary.
//!
//! Runs a single closed-loop rollout of one of the simulated systems (cart,
//! inverted pendulum, acrobot or grid world) under a chosen policy, prints a
//! short summary and optionally exports the trajectory as JSON and the
//! rendered frames as PNG files. Log verbosity follows `RUST_LOG`.

mod app;
mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = cli::Cli::parse();
    app::run(&cli)
}
