//! Context-aware value rendering with empty-value pruning.
//!
//! Every string in a value tree is evaluated through the templating
//! collaborator; results that come back empty vanish from their parent, and a
//! mapping or sequence emptied that way vanishes in turn. This is what lets
//! template authors omit optional fields by templating them to empty instead
//! of writing conditional logic.

use std::sync::OnceLock;

use convoy_common::constants::{OMIT_PLACEHOLDER_HEX_LEN, OMIT_PLACEHOLDER_PREFIX};
use regex::Regex;
use serde_yaml::Value;

use crate::engine::{EngineError, TemplateEngine};

fn omit_placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let source = format!(
            "{}[0-9a-f]{{{OMIT_PLACEHOLDER_HEX_LEN}}}",
            regex::escape(OMIT_PLACEHOLDER_PREFIX)
        );
        #[allow(clippy::expect_used)]
        Regex::new(&source).expect("omit placeholder pattern is valid")
    })
}

/// Replaces host-framework omit sentinel tokens with empty text.
#[must_use]
pub fn strip_omit_placeholder(input: &str) -> String {
    omit_placeholder_pattern().replace_all(input, "").into_owned()
}

/// Renders a value tree against `context`, pruning empty results.
///
/// Returns `None` when the value renders to absent: an empty string, a
/// mapping whose every entry rendered absent, or a sequence whose every
/// element rendered absent. Non-string scalars (booleans, numbers, null)
/// pass through unchanged and are never absent.
///
/// # Errors
///
/// Propagates any [`EngineError`] raised by the templating collaborator.
pub fn render_value(
    value: &Value,
    context: &serde_yaml::Mapping,
    engine: &dyn TemplateEngine,
) -> std::result::Result<Option<Value>, EngineError> {
    match value {
        Value::Mapping(mapping) => {
            let mut rendered = serde_yaml::Mapping::new();
            for (key, entry) in mapping {
                if let Some(result) = render_value(entry, context, engine)? {
                    let _ = rendered.insert(key.clone(), result);
                }
            }
            Ok((!rendered.is_empty()).then_some(Value::Mapping(rendered)))
        }
        Value::Sequence(sequence) => {
            let mut rendered = Vec::new();
            for element in sequence {
                if let Some(result) = render_value(element, context, engine)? {
                    rendered.push(result);
                }
            }
            Ok((!rendered.is_empty()).then_some(Value::Sequence(rendered)))
        }
        Value::String(text) => {
            let stripped = strip_omit_placeholder(text);
            let result = engine.render_str(&stripped, context)?;
            Ok((!result.is_empty()).then_some(Value::String(result)))
        }
        other => Ok(Some(other.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Interpolator;

    fn yaml(input: &str) -> Value {
        serde_yaml::from_str(input).expect("should parse test yaml")
    }

    fn mapping(input: &str) -> serde_yaml::Mapping {
        serde_yaml::from_str(input).expect("should parse test context")
    }

    fn render(value: &str, context: &str) -> Option<Value> {
        render_value(&yaml(value), &mapping(context), &Interpolator).expect("should render")
    }

    #[test]
    fn empty_string_renders_absent() {
        assert_eq!(render("''", "{}"), None);
    }

    #[test]
    fn mapping_of_empties_collapses_entirely() {
        assert_eq!(render("{a: '', b: {c: ''}}", "{}"), None);
    }

    #[test]
    fn emptied_sequence_collapses() {
        assert_eq!(render("['', '{{ MISSING }}']", "{}"), None);
    }

    #[test]
    fn partial_pruning_keeps_survivors() {
        let rendered = render("{image: nginx, env: {HOST: '{{ HOST }}'}}", "{}");
        assert_eq!(rendered, Some(yaml("{image: nginx}")));
    }

    #[test]
    fn sequence_drops_absent_elements_in_order() {
        let rendered = render("['{{ A }}', kept, '{{ B }}']", "{B: also}");
        assert_eq!(rendered, Some(yaml("[kept, also]")));
    }

    #[test]
    fn non_string_scalars_survive_untouched() {
        assert_eq!(render("false", "{}"), Some(Value::Bool(false)));
        assert_eq!(render("0", "{}"), Some(yaml("0")));
        assert_eq!(render("null", "{}"), Some(Value::Null));
    }

    #[test]
    fn omit_placeholder_is_stripped_before_rendering() {
        let token = format!("__omit_place_holder__{}", "ab01".repeat(10));
        let rendered = render(&format!("'prefix-{token}'"), "{}");
        assert_eq!(rendered, Some(Value::String("prefix-".into())));
    }

    #[test]
    fn bare_omit_placeholder_renders_absent() {
        let token = format!("__omit_place_holder__{}", "0f".repeat(20));
        assert_eq!(render(&format!("'{token}'"), "{}"), None);
    }

    #[test]
    fn short_hex_run_is_not_a_placeholder() {
        let not_a_token = "__omit_place_holder__abc";
        let rendered = render(&format!("'{not_a_token}'"), "{}");
        assert_eq!(rendered, Some(Value::String(not_a_token.into())));
    }

    #[test]
    fn required_failure_propagates() {
        let result = render_value(
            &yaml("'{{ X | required(\"x is mandatory\") }}'"),
            &mapping("{}"),
            &Interpolator,
        );
        assert!(matches!(result, Err(EngineError::Required { ref message }) if message == "x is mandatory"));
    }
}
