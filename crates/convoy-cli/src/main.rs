//! # convoy — container workload compiler CLI
//!
//! Compiles a manifest of partial templates and instance overrides into a
//! run-ordered list of container configurations.

mod commands;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
