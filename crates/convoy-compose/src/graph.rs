//! Link graph construction and cycle detection using `petgraph`.
//!
//! The run-order computation walks links recursively, so cycles are rejected
//! up front by building a directed graph over the resolved link targets and
//! checking it is acyclic. Link targets that match no known configuration are
//! left out of the graph; they are assumed to reference containers managed
//! outside this system.

use convoy_common::error::{ConvoyError, Result};

use crate::builder::ContainerConfiguration;

/// Extracts the link target from a link value: the text before the first
/// `:alias` separator, or the whole value when there is none.
#[must_use]
pub fn link_target(link: &str) -> &str {
    link.split(':').next().unwrap_or(link)
}

/// A dependency graph over container configurations and their links.
#[derive(Debug)]
pub struct LinkGraph {
    graph: petgraph::Graph<String, ()>,
}

impl LinkGraph {
    /// Builds the graph from all configurations of a run.
    ///
    /// An edge points from a link target to the configuration linking to it,
    /// so that a topological order yields link targets first.
    #[must_use]
    pub fn from_configurations(configurations: &[ContainerConfiguration]) -> Self {
        let mut graph = petgraph::Graph::new();
        let mut nodes = std::collections::HashMap::new();

        for config in configurations {
            let idx = graph.add_node(config.name().to_string());
            let _ = nodes.insert(config.name().to_string(), idx);
        }
        for config in configurations {
            let Some(links) = config.links() else {
                continue;
            };
            for link in &links {
                let target = link_target(link);
                if let Some(&target_idx) = nodes.get(target) {
                    let _ = graph.add_edge(target_idx, nodes[config.name()], ());
                } else {
                    tracing::debug!(
                        instance = config.name(),
                        link = %link,
                        "link target not managed here, ignoring"
                    );
                }
            }
        }

        Self { graph }
    }

    /// Verifies the link graph has no cycles.
    ///
    /// # Errors
    ///
    /// Returns [`ConvoyError::CyclicLink`] naming a configuration on the
    /// cycle and its link values.
    pub fn ensure_acyclic(&self, configurations: &[ContainerConfiguration]) -> Result<()> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => {
                let instance = self
                    .graph
                    .node_weight(cycle.node_id())
                    .cloned()
                    .unwrap_or_default();
                let links = configurations
                    .iter()
                    .find(|config| config.name() == instance)
                    .and_then(ContainerConfiguration::links)
                    .unwrap_or_default();
                Err(ConvoyError::CyclicLink { instance, links })
            }
        }
    }
}
