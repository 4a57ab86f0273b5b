//! Serialization of compiled configurations for CLI output.

use clap::ValueEnum;
use convoy_compose::ContainerConfiguration;

/// Supported output serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Pretty-printed JSON array.
    Json,
    /// YAML document.
    Yaml,
}

/// Serializes ordered configurations as a list of rendered mappings.
///
/// # Errors
///
/// Returns an error if serialization fails (e.g. a non-string mapping key
/// in JSON output).
pub fn render_configurations(
    configurations: Vec<ContainerConfiguration>,
    format: Format,
) -> anyhow::Result<String> {
    let mappings: Vec<serde_yaml::Mapping> = configurations
        .into_iter()
        .map(ContainerConfiguration::into_fields)
        .collect();

    let rendered = match format {
        Format::Json => {
            let mut text = serde_json::to_string_pretty(&mappings)?;
            text.push('\n');
            text
        }
        Format::Yaml => serde_yaml::to_string(&mappings)?,
    };
    Ok(rendered)
}
