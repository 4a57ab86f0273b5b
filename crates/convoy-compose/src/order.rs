//! Dependency-aware run-order computation.
//!
//! Configurations are emitted so that every container a given container
//! links to appears strictly before it. An optional priority list of
//! template names seeds the order; everything else follows in the order
//! supplied by the caller. Ties left open by the link partial order are
//! resolved by those two orders alone, keeping the result deterministic.

use std::collections::HashMap;

use convoy_common::error::Result;
use serde_yaml::Value;

use crate::builder::ContainerConfiguration;
use crate::graph::{LinkGraph, link_target};

/// Computes the run order for all configurations of a run.
///
/// The priority list is a sequence of template names: configurations built
/// from those templates (and, transitively, everything they link to) are
/// placed first, in list order. A priority value that is absent or not a
/// sequence is treated as empty. Link targets matching no known
/// configuration contribute nothing to the order.
///
/// # Errors
///
/// Returns [`convoy_common::error::ConvoyError::CyclicLink`] when the
/// resolved links form a cycle.
pub fn order(
    configurations: Vec<ContainerConfiguration>,
    priority: Option<&Value>,
) -> Result<Vec<ContainerConfiguration>> {
    LinkGraph::from_configurations(&configurations).ensure_acyclic(&configurations)?;

    let by_name: HashMap<&str, usize> = configurations
        .iter()
        .enumerate()
        .map(|(idx, config)| (config.name(), idx))
        .collect();

    let mut ordered = Vec::with_capacity(configurations.len());
    let mut placed = vec![false; configurations.len()];

    for template_name in priority_names(priority) {
        let seeded: Vec<usize> = configurations
            .iter()
            .enumerate()
            .filter(|(_, config)| config.template_name() == template_name)
            .map(|(idx, _)| idx)
            .collect();
        for idx in seeded {
            place(idx, &configurations, &by_name, &mut ordered, &mut placed);
        }
    }
    for idx in 0..configurations.len() {
        place(idx, &configurations, &by_name, &mut ordered, &mut placed);
    }

    tracing::info!(count = ordered.len(), "run order computed");
    let mut slots: Vec<Option<ContainerConfiguration>> =
        configurations.into_iter().map(Some).collect();
    Ok(ordered
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect())
}

/// Places `idx` after everything it transitively links to, depth-first in
/// link-list order, skipping anything already placed.
fn place(
    idx: usize,
    configurations: &[ContainerConfiguration],
    by_name: &HashMap<&str, usize>,
    ordered: &mut Vec<usize>,
    placed: &mut [bool],
) {
    if placed[idx] {
        return;
    }
    // Mark before recursing; the link graph is known acyclic at this point,
    // so no dependency can route back to idx.
    placed[idx] = true;

    if let Some(links) = configurations[idx].links() {
        for link in &links {
            if let Some(&target_idx) = by_name.get(link_target(link)) {
                place(target_idx, configurations, by_name, ordered, placed);
            }
        }
    }
    ordered.push(idx);
}

fn priority_names(priority: Option<&Value>) -> Vec<String> {
    match priority {
        Some(Value::Sequence(entries)) => entries
            .iter()
            .filter_map(|entry| entry.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
