//! Résumé document model and the repair pipeline that makes LLM output
//! consumable by RenderCV.
//!
//! The tree is a `serde_yaml::Value`: a tagged sum type over mappings,
//! sequences and scalars. Every repair step is a structural match over it.
//! Mappings keep insertion order, so a parse → repair → serialize cycle keeps
//! the author's key layout.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

pub mod canonicalize;
pub mod coerce;
pub mod normalize;
pub mod pipeline;
pub mod sections;

pub use pipeline::{repair_yaml, RepairReport};

/// Root key RenderCV expects the résumé body under.
pub const CV_KEY: &str = "cv";

/// Contact fields RenderCV reads from the `cv` root.
pub const CONTACT_FIELDS: [&str; 6] = [
    "name",
    "email",
    "phone",
    "location",
    "website",
    "social_networks",
];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid YAML: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("Unrecognized document structure: {0}")]
    StructureMismatch(String),

    #[error("Failed to serialize YAML: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// A parsed résumé (or cover-letter) document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Integers outside the 64-bit range (e.g. an unquoted 21-digit phone
    /// number) are rejected by `serde_yaml::Value` and surface as `Parse`.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let root = serde_yaml::from_str::<Value>(text).map_err(DocumentError::Parse)?;
        Ok(Self { root })
    }

    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        serde_yaml::to_string(&self.root).map_err(DocumentError::Serialize)
    }

    #[cfg(test)]
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    pub fn has_cv(&self) -> bool {
        self.root
            .as_mapping()
            .is_some_and(|root| root.contains_key(CV_KEY))
    }

    /// The `cv` mapping, if the root has one and it is a mapping.
    pub fn cv(&self) -> Option<&Mapping> {
        self.root.get(CV_KEY).and_then(Value::as_mapping)
    }

    pub fn cv_mut(&mut self) -> Option<&mut Mapping> {
        self.root.get_mut(CV_KEY).and_then(Value::as_mapping_mut)
    }

    /// Reads a scalar field under `cv` as display text.
    pub fn cv_text(&self, field: &str) -> Option<String> {
        self.cv()
            .and_then(|cv| cv.get(field))
            .and_then(coerce::scalar_text)
    }

    /// Ensures `root.design` is a mapping and returns it.
    ///
    /// Fails when the root is not a mapping or `design` holds a non-mapping value.
    pub fn design_mut(&mut self) -> Result<&mut Mapping, DocumentError> {
        let root = self.root.as_mapping_mut().ok_or_else(|| {
            DocumentError::StructureMismatch("document root is not a mapping".to_string())
        })?;
        let design = root
            .entry(Value::from("design"))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if design.is_null() {
            *design = Value::Mapping(Mapping::new());
        }
        design.as_mapping_mut().ok_or_else(|| {
            DocumentError::StructureMismatch("`design` is not a mapping".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_key_order_on_serialize() {
        let doc = Document::parse("cv:\n  name: Ada\n  email: ada@example.com\n  location: London\n")
            .unwrap();
        let yaml = doc.to_yaml().unwrap();
        let name_at = yaml.find("name").unwrap();
        let email_at = yaml.find("email").unwrap();
        let location_at = yaml.find("location").unwrap();
        assert!(name_at < email_at && email_at < location_at);
    }

    #[test]
    fn test_parse_rejects_invalid_yaml() {
        let result = Document::parse("cv: [unclosed");
        assert!(matches!(result, Err(DocumentError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_integer_beyond_u64() {
        let result = Document::parse("cv:\n  phone: 123456789012345678901\n");
        assert!(matches!(result, Err(DocumentError::Parse(_))));
    }

    #[test]
    fn test_parse_does_not_coerce_numbers() {
        let doc = Document::parse("cv:\n  phone: 15551234567\n").unwrap();
        assert!(doc.cv().unwrap().get("phone").unwrap().is_number());
    }

    #[test]
    fn test_cv_text_reads_scalars() {
        let doc = Document::parse("cv:\n  name: Ada\n  phone: 5551234\n").unwrap();
        assert_eq!(doc.cv_text("name").as_deref(), Some("Ada"));
        assert_eq!(doc.cv_text("phone").as_deref(), Some("5551234"));
        assert_eq!(doc.cv_text("email"), None);
    }

    #[test]
    fn test_design_mut_creates_missing_mapping() {
        let mut doc = Document::parse("cv:\n  name: Ada\n").unwrap();
        doc.design_mut()
            .unwrap()
            .insert(Value::from("theme"), Value::from("classic"));
        assert_eq!(
            doc.root().get("design").and_then(|d| d.get("theme")),
            Some(&Value::from("classic"))
        );
    }

    #[test]
    fn test_design_mut_rejects_scalar_design() {
        let mut doc = Document::parse("cv:\n  name: Ada\ndesign: fancy\n").unwrap();
        assert!(matches!(
            doc.design_mut(),
            Err(DocumentError::StructureMismatch(_))
        ));
    }
}
