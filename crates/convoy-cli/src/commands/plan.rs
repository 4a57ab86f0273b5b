//! `convoy plan` — Display the computed run order.

use std::path::PathBuf;

use clap::Args;
use convoy_common::constants::IMAGE_KEY;
use convoy_compose::Interpolator;
use convoy_compose::pipeline::compile_manifest;

/// Arguments for the `plan` subcommand.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the manifest file.
    #[arg(default_value = convoy_common::constants::DEFAULT_MANIFEST)]
    pub file: PathBuf,
}

/// Executes the `plan` command.
///
/// Compiles the manifest and prints the run order with each configuration's
/// template, image, and links.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or compilation fails.
pub fn execute(args: PlanArgs) -> anyhow::Result<()> {
    let manifest = super::compile::load_manifest(&args.file)?;
    let ordered = compile_manifest(&manifest, &Interpolator)?;

    println!("Run order for: {}", args.file.display());
    println!();

    for (position, config) in ordered.iter().enumerate() {
        println!("  {}. {}", position + 1, config.name());
        println!("      template: {}", config.template_name());
        if let Some(image) = config.fields().get(IMAGE_KEY).and_then(|v| v.as_str()) {
            println!("      image: {image}");
        }
        if let Some(links) = config.links() {
            println!("      links: {}", links.join(", "));
        }
    }

    println!();
    println!("  {} container(s) will be started.", ordered.len());

    Ok(())
}
