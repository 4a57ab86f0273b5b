//! Resolution of template inheritance chains.
//!
//! A partial template may name one or more parents under `based_on`. Each
//! name resolves to a single flattened template by folding the parents into
//! an accumulator: the child's own fields win over every parent, and among
//! parents an earlier-listed one wins over a later-listed one (each later
//! parent merges underneath the already-accumulated result).

use convoy_common::constants::BASED_ON_KEY;
use convoy_common::error::{ConvoyError, Result};
use serde_yaml::{Mapping, Value};

use crate::merge::merge;
use crate::render::strip_omit_placeholder;

/// A template with all ancestor parameters folded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    /// Declared template name.
    pub name: String,
    /// Fully merged parameter mapping, `based_on` excluded.
    pub fields: Mapping,
}

/// Resolves partial templates into flattened [`ResolvedTemplate`]s.
#[derive(Debug, Clone, Copy)]
pub struct TemplateResolver<'a> {
    templates: &'a Mapping,
}

impl<'a> TemplateResolver<'a> {
    /// Creates a resolver over a set of declared partial templates.
    #[must_use]
    pub const fn new(templates: &'a Mapping) -> Self {
        Self { templates }
    }

    /// Returns whether `name` is a declared template.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Resolves one declared template by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConvoyError::MissingTemplate`] when `name` (or any ancestor)
    /// is not declared, and [`ConvoyError::CyclicInheritance`] when the
    /// `based_on` chain revisits a template already being resolved.
    pub fn resolve(&self, name: &str) -> Result<ResolvedTemplate> {
        let mut chain = Vec::new();
        let fields = self.resolve_fields(name, &mut chain)?;
        Ok(ResolvedTemplate {
            name: name.to_string(),
            fields,
        })
    }

    /// Resolves every declared template, in declaration order.
    ///
    /// # Errors
    ///
    /// Fails on the first template whose resolution fails, or when a template
    /// name is not a string.
    pub fn resolve_all(&self) -> Result<Vec<ResolvedTemplate>> {
        tracing::info!(count = self.templates.len(), "resolving container templates");
        self.templates
            .iter()
            .map(|(key, _)| {
                let name = key.as_str().ok_or_else(|| ConvoyError::Input {
                    message: format!("template name is not a string: {key:?}"),
                })?;
                self.resolve(name)
            })
            .collect()
    }

    fn resolve_fields(&self, name: &str, chain: &mut Vec<String>) -> Result<Mapping> {
        if chain.iter().any(|ancestor| ancestor == name) {
            let mut cycle = chain.clone();
            cycle.push(name.to_string());
            return Err(ConvoyError::CyclicInheritance { chain: cycle });
        }

        let declared = self
            .templates
            .get(name)
            .ok_or_else(|| ConvoyError::MissingTemplate {
                name: name.to_string(),
            })?;
        let own = own_fields(name, declared)?;
        let parents = parent_names(own.get(BASED_ON_KEY));

        let mut current = own;
        let _ = current.remove(BASED_ON_KEY);

        chain.push(name.to_string());
        for parent in parents {
            let parent_fields = self.resolve_fields(&parent, chain)?;
            current = merge_mappings(&parent_fields, &current);
        }
        let _ = chain.pop();

        Ok(current)
    }
}

/// Merges two mappings with overlay precedence, staying in mapping form.
fn merge_mappings(base: &Mapping, overlay: &Mapping) -> Mapping {
    match merge(
        Some(&Value::Mapping(base.clone())),
        Some(&Value::Mapping(overlay.clone())),
    ) {
        Value::Mapping(merged) => merged,
        _ => Mapping::new(),
    }
}

fn own_fields(name: &str, declared: &Value) -> Result<Mapping> {
    match declared {
        Value::Mapping(fields) => Ok(fields.clone()),
        // A template declared with no body is an empty template.
        Value::Null => Ok(Mapping::new()),
        other => Err(ConvoyError::Input {
            message: format!("template \"{name}\" is not a mapping: {other:?}"),
        }),
    }
}

/// Extracts usable parent names from a `based_on` value.
///
/// Accepts nothing, null, a single name, or a sequence of names. Names that
/// are empty (or reduce to empty once omit placeholders are stripped) stand
/// for "no parent" and are skipped, as are non-string sequence entries.
fn parent_names(based_on: Option<&Value>) -> Vec<String> {
    let candidates: Vec<&Value> = match based_on {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(entries)) => entries.iter().collect(),
        Some(single) => vec![single],
    };

    let mut parents = Vec::new();
    for candidate in candidates {
        match candidate {
            Value::String(raw) => {
                let stripped = strip_omit_placeholder(raw);
                if stripped.is_empty() {
                    tracing::debug!(raw = %raw, "skipping placeholder-only based_on entry");
                } else {
                    parents.push(stripped);
                }
            }
            other => {
                tracing::debug!(?other, "skipping non-string based_on entry");
            }
        }
    }
    parents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates(input: &str) -> Mapping {
        serde_yaml::from_str(input).expect("should parse test templates")
    }

    fn resolve(input: &str, name: &str) -> Result<ResolvedTemplate> {
        let set = templates(input);
        TemplateResolver::new(&set).resolve(name)
    }

    fn field<'a>(template: &'a ResolvedTemplate, key: &str) -> Option<&'a Value> {
        template.fields.get(key)
    }

    #[test]
    fn template_without_parent_resolves_to_itself() {
        let resolved = resolve("{base: {image: nginx, x: 1}}", "base").expect("should resolve");
        assert_eq!(resolved.name, "base");
        assert_eq!(field(&resolved, "image"), Some(&Value::String("nginx".into())));
    }

    #[test]
    fn missing_template_is_an_error() {
        let err = resolve("{base: {image: nginx}}", "ghost").expect_err("should fail");
        assert!(matches!(err, ConvoyError::MissingTemplate { ref name } if name == "ghost"));
    }

    #[test]
    fn single_parent_fields_fold_in_child_wins() {
        let input = "{parent: {image: nginx, x: 1}, child: {based_on: parent, x: 2}}";
        let resolved = resolve(input, "child").expect("should resolve");
        assert_eq!(field(&resolved, "image"), Some(&Value::String("nginx".into())));
        assert_eq!(field(&resolved, "x"), Some(&serde_yaml::from_str("2").expect("yaml")));
    }

    #[test]
    fn earlier_parent_wins_over_later() {
        let input = "{a: {x: 1}, b: {x: 2}, c: {based_on: [a, b]}}";
        let resolved = resolve(input, "c").expect("should resolve");
        assert_eq!(field(&resolved, "x"), Some(&serde_yaml::from_str("1").expect("yaml")));
    }

    #[test]
    fn child_wins_over_every_parent() {
        let input = "{a: {x: 1}, b: {x: 2}, c: {based_on: [a, b], x: 9}}";
        let resolved = resolve(input, "c").expect("should resolve");
        assert_eq!(field(&resolved, "x"), Some(&serde_yaml::from_str("9").expect("yaml")));
    }

    #[test]
    fn grandparent_fields_fold_through() {
        let input = "{a: {deep: true}, b: {based_on: a, mid: 1}, c: {based_on: b}}";
        let resolved = resolve(input, "c").expect("should resolve");
        assert_eq!(field(&resolved, "deep"), Some(&Value::Bool(true)));
        assert_eq!(field(&resolved, "mid"), Some(&serde_yaml::from_str("1").expect("yaml")));
    }

    #[test]
    fn inheritance_cycle_reports_the_chain() {
        let input = "{a: {based_on: b}, b: {based_on: a}}";
        let err = resolve(input, "a").expect_err("should fail");
        match err {
            ConvoyError::CyclicInheritance { chain } => {
                assert_eq!(chain, vec!["a", "b", "a"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn self_cycle_is_detected() {
        let err = resolve("{a: {based_on: a}}", "a").expect_err("should fail");
        assert!(matches!(err, ConvoyError::CyclicInheritance { .. }));
    }

    #[test]
    fn null_and_empty_based_on_mean_no_parent() {
        let resolved = resolve("{a: {based_on: null, x: 1}}", "a").expect("should resolve");
        assert_eq!(field(&resolved, "x"), Some(&serde_yaml::from_str("1").expect("yaml")));
        let resolved = resolve("{a: {based_on: '', x: 1}}", "a").expect("should resolve");
        assert_eq!(field(&resolved, "x"), Some(&serde_yaml::from_str("1").expect("yaml")));
    }

    #[test]
    fn placeholder_only_parent_is_skipped() {
        let token = format!("__omit_place_holder__{}", "3c".repeat(20));
        let input = format!("{{a: {{based_on: '{token}', x: 1}}}}");
        let resolved = resolve(&input, "a").expect("should resolve");
        assert_eq!(field(&resolved, "x"), Some(&serde_yaml::from_str("1").expect("yaml")));
    }

    #[test]
    fn based_on_is_excluded_from_resolved_fields() {
        let input = "{parent: {image: nginx}, child: {based_on: parent}}";
        let resolved = resolve(input, "child").expect("should resolve");
        assert!(resolved.fields.get("based_on").is_none());
    }

    #[test]
    fn parent_sequences_concatenate_into_child() {
        let input = "{parent: {volumes: [/data]}, child: {based_on: parent, volumes: [/logs]}}";
        let resolved = resolve(input, "child").expect("should resolve");
        assert_eq!(
            field(&resolved, "volumes"),
            Some(&serde_yaml::from_str("[/data, /logs]").expect("yaml"))
        );
    }

    #[test]
    fn resolve_all_is_idempotent_over_shared_input() {
        let set = templates("{a: {x: 1}, b: {based_on: a, y: 2}}");
        let resolver = TemplateResolver::new(&set);
        let first = resolver.resolve_all().expect("should resolve");
        let second = resolver.resolve_all().expect("should resolve");
        assert_eq!(first, second);
    }

    #[test]
    fn resolve_all_preserves_declaration_order() {
        let set = templates("{zeta: {x: 1}, alpha: {x: 2}}");
        let resolver = TemplateResolver::new(&set);
        let names: Vec<String> = resolver
            .resolve_all()
            .expect("should resolve")
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }
}
