//! Recursive structural merge of raw value trees.
//!
//! The merge is the single precedence rule the whole pipeline is built on:
//! template inheritance and instance overrides both reduce to "overlay wins".

use serde_yaml::Value;

/// Merges two value trees, the overlay taking precedence.
///
/// - If either side is absent, the other is returned (absent on both sides
///   yields an empty mapping).
/// - Keys present on only one side pass through unchanged.
/// - When both sides hold mappings, they merge recursively; when both hold
///   sequences, the result is base's elements followed by overlay's (no
///   deduplication); otherwise overlay's value replaces base's entirely.
#[must_use]
pub fn merge(base: Option<&Value>, overlay: Option<&Value>) -> Value {
    match (base, overlay) {
        (None, None) => Value::Mapping(serde_yaml::Mapping::new()),
        (Some(b), None) => b.clone(),
        (None, Some(o)) => o.clone(),
        (Some(b), Some(o)) => merge_values(b, o),
    }
}

fn merge_values(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(b), Value::Mapping(o)) => {
            let mut merged = b.clone();
            for (key, overlay_value) in o {
                let combined = match merged.get(key) {
                    Some(base_value) => merge_values(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                let _ = merged.insert(key.clone(), combined);
            }
            Value::Mapping(merged)
        }
        (Value::Sequence(b), Value::Sequence(o)) => {
            let mut merged = b.clone();
            merged.extend(o.iter().cloned());
            Value::Sequence(merged)
        }
        (_, o) => o.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(input: &str) -> Value {
        serde_yaml::from_str(input).expect("should parse test yaml")
    }

    #[test]
    fn absent_both_sides_yields_empty_mapping() {
        let merged = merge(None, None);
        assert_eq!(merged, Value::Mapping(serde_yaml::Mapping::new()));
    }

    #[test]
    fn absent_side_returns_the_other() {
        let base = yaml("{a: 1}");
        assert_eq!(merge(Some(&base), None), base);
        assert_eq!(merge(None, Some(&base)), base);
    }

    #[test]
    fn scalar_overlay_wins() {
        let base = yaml("{x: 1, y: keep}");
        let overlay = yaml("{x: 2}");
        let merged = merge(Some(&base), Some(&overlay));
        assert_eq!(merged, yaml("{x: 2, y: keep}"));
    }

    #[test]
    fn sequences_concatenate_base_first() {
        let base = yaml("{l: [1, 2]}");
        let overlay = yaml("{l: [3]}");
        let merged = merge(Some(&base), Some(&overlay));
        assert_eq!(merged, yaml("{l: [1, 2, 3]}"));
    }

    #[test]
    fn sequences_keep_duplicates() {
        let base = yaml("[a, b]");
        let overlay = yaml("[b]");
        let merged = merge(Some(&base), Some(&overlay));
        assert_eq!(merged, yaml("[a, b, b]"));
    }

    #[test]
    fn nested_mappings_merge_recursively() {
        let base = yaml("{env: {A: '1', B: '2'}}");
        let overlay = yaml("{env: {B: '3', C: '4'}}");
        let merged = merge(Some(&base), Some(&overlay));
        assert_eq!(merged, yaml("{env: {A: '1', B: '3', C: '4'}}"));
    }

    #[test]
    fn mapping_replaced_by_scalar() {
        let base = yaml("{v: {nested: true}}");
        let overlay = yaml("{v: flat}");
        let merged = merge(Some(&base), Some(&overlay));
        assert_eq!(merged, yaml("{v: flat}"));
    }

    #[test]
    fn merge_does_not_mutate_inputs() {
        let base = yaml("{l: [1], m: {a: 1}}");
        let overlay = yaml("{l: [2], m: {b: 2}}");
        let before = base.clone();
        let _ = merge(Some(&base), Some(&overlay));
        assert_eq!(base, before);
    }
}
