//! Building one rendered, validated configuration per instance.
//!
//! An instance override contributes twice: its whitelisted keys merge over
//! the resolved template as values, and the full override (plus the
//! instance's own name) forms the rendering context every template string is
//! evaluated against.

use convoy_common::constants::{CONFIG_NAME_KEY, IMAGE_KEY, LINKS_KEY};
use convoy_common::error::{ConvoyError, Result};
use serde_yaml::{Mapping, Value};

use crate::engine::TemplateEngine;
use crate::merge::merge;
use crate::params::is_container_parameter;
use crate::render::render_value;
use crate::template::ResolvedTemplate;

/// A rendered container configuration, ready to hand to a lifecycle runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfiguration {
    name: String,
    template_name: String,
    fields: Mapping,
}

impl ContainerConfiguration {
    /// Builds and validates the configuration for one instance.
    ///
    /// # Errors
    ///
    /// Returns [`ConvoyError::TemplateRender`] when the templating
    /// collaborator fails, and [`ConvoyError::MissingImage`] when the
    /// rendered result lacks a non-null `image` key.
    pub fn build(
        instance_name: &str,
        template: &ResolvedTemplate,
        overrides: &Mapping,
        engine: &dyn TemplateEngine,
    ) -> Result<Self> {
        tracing::debug!(instance = instance_name, template = %template.name, "building configuration");
        let combined = combine(template, overrides);
        let context = rendering_context(instance_name, overrides);

        let mut fields = Mapping::new();
        for (key, value) in &combined {
            let rendered = render_value(value, &context, engine).map_err(|source| {
                ConvoyError::TemplateRender {
                    instance: instance_name.to_string(),
                    template: template.name.clone(),
                    message: source.to_string(),
                }
            })?;
            if let Some(result) = rendered {
                let _ = fields.insert(key.clone(), result);
            }
        }

        match fields.get(IMAGE_KEY) {
            Some(image) if !image.is_null() => {}
            _ => {
                return Err(ConvoyError::MissingImage {
                    instance: instance_name.to_string(),
                    template: template.name.clone(),
                });
            }
        }

        Ok(Self {
            name: instance_name.to_string(),
            template_name: template.name.clone(),
            fields,
        })
    }

    /// The instance name this configuration was built for.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The template the configuration was built from.
    #[must_use]
    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// The rendered configuration mapping.
    #[must_use]
    pub const fn fields(&self) -> &Mapping {
        &self.fields
    }

    /// Consumes the configuration, yielding its rendered mapping.
    #[must_use]
    pub fn into_fields(self) -> Mapping {
        self.fields
    }

    /// The rendered `links` entries, normalized to a list.
    ///
    /// A sequence is returned as-is (string elements only), a single string
    /// becomes a one-element list, and anything else is absent.
    #[must_use]
    pub fn links(&self) -> Option<Vec<String>> {
        match self.fields.get(LINKS_KEY)? {
            Value::Sequence(entries) => Some(
                entries
                    .iter()
                    .filter_map(|entry| entry.as_str().map(str::to_string))
                    .collect(),
            ),
            Value::String(single) => Some(vec![single.clone()]),
            _ => None,
        }
    }
}

/// Merges the whitelist-filtered override over the resolved template.
fn combine(template: &ResolvedTemplate, overrides: &Mapping) -> Mapping {
    let mut filtered = Mapping::new();
    for (key, value) in overrides {
        match key.as_str() {
            Some(name) if is_container_parameter(name) => {
                let _ = filtered.insert(key.clone(), value.clone());
            }
            Some(name) => {
                tracing::debug!(key = name, "override key kept out of the combined template");
            }
            None => {
                tracing::debug!(?key, "skipping non-string override key");
            }
        }
    }

    match merge(
        Some(&Value::Mapping(template.fields.clone())),
        Some(&Value::Mapping(filtered)),
    ) {
        Value::Mapping(combined) => combined,
        _ => Mapping::new(),
    }
}

/// The full override mapping plus the instance's own name.
fn rendering_context(instance_name: &str, overrides: &Mapping) -> Mapping {
    let mut context = overrides.clone();
    let _ = context.insert(
        Value::String(CONFIG_NAME_KEY.to_string()),
        Value::String(instance_name.to_string()),
    );
    context
}
