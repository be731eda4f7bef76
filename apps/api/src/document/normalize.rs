//! Field normalizer: lifts contact fields out of `cv.basics`.
//!
//! LLMs frequently emit the JSON-Resume style `basics` block while RenderCV
//! reads contact details from the `cv` root. Values are copied, never moved,
//! and fields already present on the root win.

use serde_yaml::{Mapping, Value};

use super::pipeline::{RepairStep, StepSkipped};
use super::{CONTACT_FIELDS, CV_KEY};

const BASICS_KEY: &str = "basics";

/// Wraps a bare résumé body under `cv` when the LLM dropped the root key.
///
/// Returns `Ok(true)` when the root was re-wrapped, `Ok(false)` when `cv`
/// was already present. A root that has neither `cv` nor any contact field
/// is not recognizable as a résumé.
pub fn ensure_cv_root(root: &mut Value) -> Result<bool, String> {
    let mapping = match root {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Err("document is empty".to_string()),
        _ => return Err("document root is not a mapping".to_string()),
    };

    if mapping.contains_key(CV_KEY) {
        return Ok(false);
    }

    if !CONTACT_FIELDS.iter().any(|field| mapping.contains_key(*field)) {
        return Err(format!(
            "no `{CV_KEY}` key and no top-level contact field ({})",
            CONTACT_FIELDS.join(", ")
        ));
    }

    let body = std::mem::take(mapping);
    let mut wrapped = Mapping::new();
    wrapped.insert(Value::from(CV_KEY), Value::Mapping(body));
    *root = Value::Mapping(wrapped);
    Ok(true)
}

/// Copies canonical contact fields from `cv.basics` to `cv` when missing there.
///
/// Returns the names of the fields that were copied, in canonical order.
pub fn lift_basics(cv: &mut Mapping) -> Result<Vec<String>, StepSkipped> {
    let basics = match cv.get(BASICS_KEY) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Mapping(basics)) => basics,
        Some(_) => {
            return Err(StepSkipped::new(
                RepairStep::FieldNormalize,
                "`cv.basics` is not a mapping",
            ))
        }
    };

    let lifted: Vec<(&str, Value)> = CONTACT_FIELDS
        .iter()
        .filter(|field| !cv.contains_key(**field))
        .filter_map(|field| basics.get(*field).map(|value| (*field, value.clone())))
        .collect();

    let mut names = Vec::with_capacity(lifted.len());
    for (field, value) in lifted {
        cv.insert(Value::from(field), value);
        names.push(field.to_string());
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_lift_email_from_basics() {
        let mut cv = mapping("basics:\n  email: ada@example.com\n");
        let lifted = lift_basics(&mut cv).unwrap();
        assert_eq!(lifted, vec!["email"]);
        assert_eq!(cv.get("email"), Some(&Value::from("ada@example.com")));
    }

    #[test]
    fn test_lift_keeps_basics_intact() {
        let mut cv = mapping("basics:\n  name: Ada\n");
        lift_basics(&mut cv).unwrap();
        assert_eq!(
            cv.get("basics").and_then(|b| b.get("name")),
            Some(&Value::from("Ada"))
        );
    }

    #[test]
    fn test_lift_does_not_overwrite_root_fields() {
        let mut cv = mapping("name: Root Name\nbasics:\n  name: Basics Name\n  phone: '+1 555'\n");
        let lifted = lift_basics(&mut cv).unwrap();
        assert_eq!(lifted, vec!["phone"]);
        assert_eq!(cv.get("name"), Some(&Value::from("Root Name")));
    }

    #[test]
    fn test_lift_ignores_non_contact_fields() {
        let mut cv = mapping("basics:\n  nationality: German\n  social_networks:\n    - network: GitHub\n      username: ada\n");
        let lifted = lift_basics(&mut cv).unwrap();
        assert_eq!(lifted, vec!["social_networks"]);
        assert!(!cv.contains_key("nationality"));
        assert!(cv.get("social_networks").unwrap().is_sequence());
    }

    #[test]
    fn test_lift_without_basics_is_noop() {
        let mut cv = mapping("name: Ada\n");
        assert!(lift_basics(&mut cv).unwrap().is_empty());
        assert_eq!(cv.len(), 1);
    }

    #[test]
    fn test_lift_skips_scalar_basics() {
        let mut cv = mapping("basics: none given\n");
        let skipped = lift_basics(&mut cv).unwrap_err();
        assert_eq!(skipped.step, RepairStep::FieldNormalize);
    }

    #[test]
    fn test_ensure_cv_root_wraps_bare_body() {
        let mut root: Value = serde_yaml::from_str("name: AI forgot cv root\n").unwrap();
        assert!(ensure_cv_root(&mut root).unwrap());
        assert_eq!(
            root.get("cv").and_then(|cv| cv.get("name")),
            Some(&Value::from("AI forgot cv root"))
        );
    }

    #[test]
    fn test_ensure_cv_root_accepts_existing_cv() {
        let mut root: Value = serde_yaml::from_str("cv:\n  name: Ada\ndesign:\n  theme: classic\n").unwrap();
        let before = root.clone();
        assert!(!ensure_cv_root(&mut root).unwrap());
        assert_eq!(root, before);
    }

    #[test]
    fn test_ensure_cv_root_rejects_unrecognized_root() {
        let mut root: Value = serde_yaml::from_str("summary: hello\n").unwrap();
        assert!(ensure_cv_root(&mut root).is_err());

        let mut scalar = Value::from("just text");
        assert!(ensure_cv_root(&mut scalar).is_err());

        let mut empty = Value::Null;
        assert!(ensure_cv_root(&mut empty).is_err());
    }
}
