//! # convoy-compose
//!
//! Compiles declarative container-workload definitions into a fully
//! resolved, run-ordered list of container configurations.
//!
//! Handles:
//! - **Merge**: Recursive structural merge of raw value trees.
//! - **Template**: Resolution of template inheritance chains (`based_on`).
//! - **Render**: Context-aware value rendering with empty-value pruning.
//! - **Engine**: The templating collaborator seam and a minimal default.
//! - **Builder**: Whitelist filtering, rendering, and validation of one
//!   configuration per instance.
//! - **Graph**: Link-graph construction and cycle detection.
//! - **Order**: Dependency-aware run-order computation.
//! - **Pipeline**: The end-to-end compile entry point.

pub mod builder;
pub mod engine;
pub mod graph;
pub mod merge;
pub mod order;
pub mod params;
pub mod pipeline;
pub mod render;
pub mod template;

pub use builder::ContainerConfiguration;
pub use engine::{Interpolator, TemplateEngine};
pub use pipeline::compile;
pub use template::ResolvedTemplate;
