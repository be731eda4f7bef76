//! Open-ended date canonicalization.
//!
//! RenderCV only accepts the lower-case literal `present` as an open end
//! date; models write `Present`, `Current`, `now` and so on.

use serde_yaml::Value;

/// The only spelling RenderCV accepts for an ongoing date range.
pub const OPEN_ENDED_MARKER: &str = "present";

const OPEN_ENDED_SYNONYMS: [&str; 3] = ["present", "current", "now"];

/// True when `text` (trimmed, case-insensitive) names an open-ended date.
pub fn is_open_ended(text: &str) -> bool {
    let probe = text.trim().to_lowercase();
    OPEN_ENDED_SYNONYMS.contains(&probe.as_str())
}

/// Rewrites every open-ended synonym in the tree to [`OPEN_ENDED_MARKER`].
///
/// Only mapping values and sequence items are visited; keys and non-string
/// scalars are left alone. Returns the number of strings that changed.
pub fn canonicalize_open_ended(value: &mut Value) -> usize {
    match value {
        Value::String(text) => {
            if text.as_str() != OPEN_ENDED_MARKER && is_open_ended(text) {
                *text = OPEN_ENDED_MARKER.to_string();
                1
            } else {
                0
            }
        }
        Value::Sequence(items) => items.iter_mut().map(canonicalize_open_ended).sum(),
        Value::Mapping(mapping) => mapping.values_mut().map(canonicalize_open_ended).sum(),
        Value::Tagged(tagged) => canonicalize_open_ended(&mut tagged.value),
        Value::Null | Value::Bool(_) | Value::Number(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_synonyms_become_present() {
        for raw in ["Present", "CURRENT", " now ", "present", "Now\n"] {
            let mut value = Value::from(raw);
            canonicalize_open_ended(&mut value);
            assert_eq!(value, Value::from("present"), "input {raw:?}");
        }
    }

    #[test]
    fn test_other_strings_are_untouched() {
        for raw in ["Presently", "Current Role", "2024-01-01", "NOW Inc.", ""] {
            let mut value = Value::from(raw);
            assert_eq!(canonicalize_open_ended(&mut value), 0);
            assert_eq!(value, Value::from(raw));
        }
    }

    #[test]
    fn test_traverses_nested_sections() {
        let mut value = tree(
            r#"
cv:
  sections:
    experience:
      - company: Acme
        start_date: 2021-03-01
        end_date: Current
        highlights:
          - Shipped things now and then
      - company: Initech
        end_date: NOW
"#,
        );
        assert_eq!(canonicalize_open_ended(&mut value), 2);
        let entries = value["cv"]["sections"]["experience"].as_sequence().unwrap();
        assert_eq!(entries[0]["end_date"], Value::from("present"));
        assert_eq!(entries[1]["end_date"], Value::from("present"));
        assert_eq!(
            entries[0]["highlights"][0],
            Value::from("Shipped things now and then")
        );
    }

    #[test]
    fn test_keys_and_non_strings_untouched() {
        let mut value = tree("Current: 1\nflag: true\ncount: 3\nempty: ~\n");
        assert_eq!(canonicalize_open_ended(&mut value), 0);
        assert!(value.get("Current").is_some());
        assert_eq!(value["flag"], Value::Bool(true));
        assert!(value["empty"].is_null());
    }

    #[test]
    fn test_already_canonical_counts_as_unchanged() {
        let mut value = tree("end_date: present\n");
        assert_eq!(canonicalize_open_ended(&mut value), 0);
    }

    #[test]
    fn test_descends_into_tagged_values() {
        let mut value = tree("end: !date Current\n");
        assert_eq!(canonicalize_open_ended(&mut value), 1);
        match &value["end"] {
            Value::Tagged(tagged) => assert_eq!(tagged.value, Value::from("present")),
            other => panic!("expected tagged value, got {other:?}"),
        }
    }
}
