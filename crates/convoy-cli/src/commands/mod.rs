//! CLI command definitions and dispatch.

pub mod compile;
pub mod plan;

use clap::{Parser, Subcommand};

/// Convoy — compile container workload manifests into run-ordered configurations.
#[derive(Parser, Debug)]
#[command(name = "convoy", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a manifest and emit the ordered configuration list.
    Compile(compile::CompileArgs),
    /// Display the computed run order without emitting configurations.
    Plan(plan::PlanArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Compile(args) => compile::execute(args),
        Command::Plan(args) => plan::execute(args),
    }
}
