//! `convoy compile` — Compile a manifest into ordered configurations.

use std::path::PathBuf;

use clap::Args;
use convoy_compose::Interpolator;
use convoy_compose::pipeline::{Manifest, compile_manifest};

use crate::output::{Format, render_configurations};

/// Arguments for the `compile` subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Path to the manifest file.
    #[arg(default_value = convoy_common::constants::DEFAULT_MANIFEST)]
    pub file: PathBuf,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output serialization format.
    #[arg(long, value_enum, default_value = "json")]
    pub format: Format,
}

/// Executes the `compile` command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, or if the
/// pipeline fails.
pub fn execute(args: CompileArgs) -> anyhow::Result<()> {
    tracing::info!(path = %args.file.display(), "compiling manifest");
    let manifest = load_manifest(&args.file)?;
    let ordered = compile_manifest(&manifest, &Interpolator)?;
    let rendered = render_configurations(ordered, args.format)?;

    if let Some(ref out_path) = args.output {
        std::fs::write(out_path, &rendered)?;
        println!("Compiled {} -> {}", args.file.display(), out_path.display());
    } else {
        print!("{rendered}");
    }

    Ok(())
}

/// Reads and deserializes a manifest file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML.
pub fn load_manifest(path: &std::path::Path) -> anyhow::Result<Manifest> {
    if !path.exists() {
        anyhow::bail!("manifest not found: {}", path.display());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}
