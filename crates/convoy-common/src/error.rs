//! Unified error types for the Convoy workspace.
//!
//! Every pipeline failure is fatal to the run: the compiler either returns a
//! complete run order or one of these errors, carrying enough context
//! (instance name, template name, or offending link value) to diagnose
//! without re-running.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ConvoyError {
    /// A referenced template name is not declared in the template set.
    #[error("container template set does not contain \"{name}\"")]
    MissingTemplate {
        /// Name of the missing template.
        name: String,
    },

    /// A `based_on` chain revisits a template already being resolved.
    #[error("cyclic based_on chain: {}", chain.join(" -> "))]
    CyclicInheritance {
        /// The resolution path, ending with the repeated name.
        chain: Vec<String>,
    },

    /// An instance override has no usable `template` reference.
    #[error("instance \"{instance}\" has no usable template reference: {reason}")]
    MissingTemplateReference {
        /// Name of the offending instance.
        instance: String,
        /// What was wrong with the reference.
        reason: String,
    },

    /// Expression evaluation failed inside the templating collaborator.
    #[error("error while configuring \"{instance}\" with container template \"{template}\": {message}")]
    TemplateRender {
        /// Instance being configured.
        instance: String,
        /// Template the instance is built from.
        template: String,
        /// Message reported by the templating engine.
        message: String,
    },

    /// A rendered configuration lacks a non-null `image` key.
    #[error("invalid container configuration \"{instance}\": template \"{template}\" renders no image")]
    MissingImage {
        /// Instance whose configuration is invalid.
        instance: String,
        /// Template the instance is built from.
        template: String,
    },

    /// Container links form a cycle.
    #[error("cyclic container link involving \"{instance}\" (links: {links:?})")]
    CyclicLink {
        /// A configuration on the cycle.
        instance: String,
        /// Its rendered link values.
        links: Vec<String>,
    },

    /// An input map has an unusable shape (e.g. a non-string key).
    #[error("invalid input: {message}")]
    Input {
        /// Description of the malformed input.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// YAML deserialization or serialization failed.
    #[error("YAML error: {source}")]
    Yaml {
        /// Underlying YAML error.
        #[from]
        source: serde_yaml::Error,
    },

    /// JSON serialization failed.
    #[error("JSON error: {source}")]
    Json {
        /// Underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ConvoyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_inheritance_lists_full_chain() {
        let err = ConvoyError::CyclicInheritance {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "cyclic based_on chain: a -> b -> a");
    }

    #[test]
    fn render_error_names_instance_and_template() {
        let err = ConvoyError::TemplateRender {
            instance: "web".into(),
            template: "nginx".into(),
            message: "boom".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"web\""), "got: {msg}");
        assert!(msg.contains("\"nginx\""), "got: {msg}");
        assert!(msg.contains("boom"), "got: {msg}");
    }
}
