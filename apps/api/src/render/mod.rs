//! PDF rendering: résumés through the RenderCV executable, cover letters
//! drawn directly with `lopdf`.
//!
//! `AppState` holds an `Arc<dyn ResumeRenderer>`; `RenderCvRenderer` is the
//! production backend and tests swap in a stub.

pub mod cover_letter;
pub mod handlers;
pub mod metrics;
pub mod rendercv;

use async_trait::async_trait;
use bytes::Bytes;
use serde_yaml::Value;
use thiserror::Error;
use tracing::warn;

use crate::document::{Document, DocumentError};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error while rendering: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not start renderer `{bin}`: {message}")]
    Spawn { bin: String, message: String },

    #[error("RenderCV generation failed. Logs: {stderr}")]
    Failed { stderr: String },

    #[error("PDF file not generated")]
    NoOutput,

    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(e: lopdf::Error) -> Self {
        RenderError::Pdf(e.to_string())
    }
}

/// Turns a complete RenderCV YAML document into PDF bytes.
#[async_trait]
pub trait ResumeRenderer: Send + Sync {
    async fn render(&self, yaml: &str) -> Result<Bytes, RenderError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Themes
// ────────────────────────────────────────────────────────────────────────────

/// RenderCV themes the frontend offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Classic,
    Engineering,
    Sb2nov,
}

impl Theme {
    /// Unsupported names render with `sb2nov`.
    pub fn resolve(name: &str) -> Self {
        match name.trim() {
            "classic" => Theme::Classic,
            "engineering" => Theme::Engineering,
            "sb2nov" => Theme::Sb2nov,
            other => {
                warn!("Theme '{other}' is not supported, falling back to sb2nov");
                Theme::Sb2nov
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Engineering => "engineering",
            Theme::Sb2nov => "sb2nov",
        }
    }
}

/// Validates a résumé for rendering and stamps `design.theme` into it.
///
/// Returns the serialized document that will be handed to the renderer.
pub fn prepare_for_render(yaml: &str, theme: Theme) -> Result<String, DocumentError> {
    let mut document = Document::parse(yaml)?;
    if !document.has_cv() {
        return Err(DocumentError::StructureMismatch(
            "Invalid Resume YAML: Missing 'cv' key.".to_string(),
        ));
    }

    document
        .design_mut()?
        .insert(Value::from("theme"), Value::from(theme.as_str()));
    document.to_yaml()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_resolution() {
        assert_eq!(Theme::resolve("classic"), Theme::Classic);
        assert_eq!(Theme::resolve("engineering"), Theme::Engineering);
        assert_eq!(Theme::resolve("moderncv"), Theme::Sb2nov);
        assert_eq!(Theme::resolve(""), Theme::Sb2nov);
    }

    #[test]
    fn test_prepare_sets_theme_on_new_design() {
        let yaml = prepare_for_render("cv:\n  name: Ada\n", Theme::Engineering).unwrap();
        let value: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value["design"]["theme"], Value::from("engineering"));
        assert_eq!(value["cv"]["name"], Value::from("Ada"));
    }

    #[test]
    fn test_prepare_overrides_existing_theme_and_keeps_design_keys() {
        let yaml = prepare_for_render(
            "cv:\n  name: Ada\ndesign:\n  theme: moderncv\n  page_size: a4\n",
            Theme::Classic,
        )
        .unwrap();
        let value: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value["design"]["theme"], Value::from("classic"));
        assert_eq!(value["design"]["page_size"], Value::from("a4"));
    }

    #[test]
    fn test_prepare_fills_null_design() {
        let yaml = prepare_for_render("cv:\n  name: Ada\ndesign:\n", Theme::Sb2nov).unwrap();
        assert!(yaml.contains("theme: sb2nov"));
    }

    #[test]
    fn test_prepare_requires_cv() {
        let err = prepare_for_render("name: Ada\n", Theme::Classic).unwrap_err();
        assert!(err.to_string().contains("Missing 'cv' key"));
    }

    #[test]
    fn test_prepare_rejects_invalid_yaml() {
        let result = prepare_for_render("cv: [", Theme::Classic);
        assert!(matches!(result, Err(DocumentError::Parse(_))));
    }
}
