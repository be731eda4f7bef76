//! Axum route handlers for PDF rendering.

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::analytics::EventType;
use crate::errors::AppError;
use crate::render::cover_letter::{render_cover_letter_pdf, ContactHeader};
use crate::render::{prepare_for_render, Theme};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

fn default_theme() -> String {
    Theme::default().as_str().to_string()
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub resume_yaml: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub pdf_base64: String,
    pub final_yaml: String,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterPdfRequest {
    #[serde(default)]
    pub resume_yaml: String,
    pub cover_letter_text: String,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterPdfResponse {
    pub pdf_base64: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /render
///
/// Stamps the theme into the résumé and renders it to PDF with RenderCV.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    let theme = Theme::resolve(&request.theme);
    let final_yaml = prepare_for_render(&request.resume_yaml, theme)?;

    let pdf = state.renderer.render(&final_yaml).await?;
    info!("Rendered resume PDF: theme={}, bytes={}", theme.as_str(), pdf.len());

    let mut details = serde_json::Map::new();
    details.insert("theme".to_string(), Value::from(theme.as_str()));
    state
        .analytics
        .record(EventType::ResumeRendered, details)
        .await;

    Ok(Json(RenderResponse {
        pdf_base64: STANDARD.encode(&pdf),
        final_yaml,
    }))
}

/// POST /render_cover_letter_pdf
pub async fn handle_render_cover_letter_pdf(
    Json(request): Json<CoverLetterPdfRequest>,
) -> Result<Json<CoverLetterPdfResponse>, AppError> {
    if request.cover_letter_text.trim().is_empty() {
        return Err(AppError::Validation(
            "cover_letter_text cannot be empty".to_string(),
        ));
    }

    let header = ContactHeader::from_resume_yaml(&request.resume_yaml);
    let date = chrono::Local::now().format("%B %d, %Y").to_string();
    let pdf = render_cover_letter_pdf(&header, &date, &request.cover_letter_text)?;

    Ok(Json(CoverLetterPdfResponse {
        pdf_base64: STANDARD.encode(pdf),
    }))
}
