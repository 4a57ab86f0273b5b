//! The end-to-end compile pipeline.
//!
//! Ties the stages together: resolve every declared template, build one
//! rendered configuration per instance, then compute the run order. All
//! inputs are immutable and fully materialized before processing begins;
//! the pipeline either returns a complete run order or fails with the first
//! error it hits.

use std::collections::HashMap;

use convoy_common::constants::TEMPLATE_KEY;
use convoy_common::error::{ConvoyError, Result};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::builder::ContainerConfiguration;
use crate::engine::TemplateEngine;
use crate::order::order;
use crate::template::TemplateResolver;

/// The three pipeline inputs in their on-disk manifest form.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Named partial templates.
    pub templates: Mapping,
    /// Named instance overrides, each referencing a declared template.
    #[serde(alias = "config")]
    pub instances: Mapping,
    /// Optional priority list of template names.
    #[serde(default)]
    pub run_order: Option<Value>,
}

/// Compiles templates and instance overrides into run-ordered configurations.
///
/// # Errors
///
/// Fails with the first resolution, rendering, validation, or ordering error;
/// there is no partial-success mode.
pub fn compile(
    templates: &Mapping,
    instances: &Mapping,
    priority: Option<&Value>,
    engine: &dyn TemplateEngine,
) -> Result<Vec<ContainerConfiguration>> {
    tracing::info!(
        templates = templates.len(),
        instances = instances.len(),
        "compiling container workload definitions"
    );

    let resolver = TemplateResolver::new(templates);
    let resolved: HashMap<String, _> = resolver
        .resolve_all()?
        .into_iter()
        .map(|template| (template.name.clone(), template))
        .collect();

    let mut configurations = Vec::with_capacity(instances.len());
    for (key, value) in instances {
        let name = key.as_str().ok_or_else(|| ConvoyError::Input {
            message: format!("instance name is not a string: {key:?}"),
        })?;
        let overrides = value.as_mapping().ok_or_else(|| ConvoyError::Input {
            message: format!("instance \"{name}\" is not a mapping"),
        })?;
        let template = referenced_template(name, overrides, &resolved)?;
        configurations.push(ContainerConfiguration::build(
            name, template, overrides, engine,
        )?);
    }

    order(configurations, priority)
}

/// Compiles a deserialized manifest.
///
/// # Errors
///
/// Same failure modes as [`compile`].
pub fn compile_manifest(
    manifest: &Manifest,
    engine: &dyn TemplateEngine,
) -> Result<Vec<ContainerConfiguration>> {
    compile(
        &manifest.templates,
        &manifest.instances,
        manifest.run_order.as_ref(),
        engine,
    )
}

fn referenced_template<'a>(
    instance: &str,
    overrides: &Mapping,
    resolved: &'a HashMap<String, crate::template::ResolvedTemplate>,
) -> Result<&'a crate::template::ResolvedTemplate> {
    let reference = overrides
        .get(TEMPLATE_KEY)
        .ok_or_else(|| ConvoyError::MissingTemplateReference {
            instance: instance.to_string(),
            reason: "no template field declared".to_string(),
        })?;
    let template_name = reference
        .as_str()
        .ok_or_else(|| ConvoyError::MissingTemplateReference {
            instance: instance.to_string(),
            reason: format!("template field is not a string: {reference:?}"),
        })?;
    resolved
        .get(template_name)
        .ok_or_else(|| ConvoyError::MissingTemplateReference {
            instance: instance.to_string(),
            reason: format!("references undeclared template \"{template_name}\""),
        })
}
