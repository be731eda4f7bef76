//! Axum route handlers for the tailoring API.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::analytics::{usage_details, EventType};
use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::ats::{score_resume, AtsReport, AtsRequest};
use crate::tailoring::cover_letter::{generate_cover_letter, CoverLetterRequest, CoverLetterResponse};
use crate::tailoring::detection::{detect_ai_patterns, AiDetectionReport, DetectAiRequest};
use crate::tailoring::outreach::{
    generate_linkedin, generate_outreach, LinkedInRequest, LinkedInResponse, OutreachRequest,
    OutreachResponse,
};
use crate::tailoring::rewrite::{rewrite_resume, RewriteRequest, RewriteResponse};

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// POST /rewrite
///
/// Tailors a RenderCV résumé to a job description and repairs the result.
pub async fn handle_rewrite(
    State(state): State<AppState>,
    Json(request): Json<RewriteRequest>,
) -> Result<Json<RewriteResponse>, AppError> {
    require("job_description", &request.job_description)?;
    require("current_yaml", &request.current_yaml)?;

    let credentials =
        state.credentials(request.api_key.as_deref(), request.model_version.as_deref())?;
    let outcome = rewrite_resume(state.llm.as_ref(), &credentials, &request).await?;

    let mut details = usage_details(outcome.usage);
    details.insert(
        "target_region".to_string(),
        Value::from(request.target_region.as_str()),
    );
    details.insert("model".to_string(), Value::from(credentials.model.as_str()));
    state
        .analytics
        .record(EventType::ResumeGenerated, details)
        .await;

    Ok(Json(outcome.response))
}

/// POST /ats_score
///
/// Always 200 once credentials resolve; scoring failures return the fallback report.
pub async fn handle_ats_score(
    State(state): State<AppState>,
    Json(request): Json<AtsRequest>,
) -> Result<Json<AtsReport>, AppError> {
    require("resume_yaml", &request.resume_yaml)?;

    let credentials = state.credentials(request.api_key.as_deref(), None)?;
    let report = score_resume(
        state.llm.as_ref(),
        &credentials,
        &request.resume_yaml,
        &request.job_description,
    )
    .await;
    Ok(Json(report))
}

/// POST /detect_ai
pub async fn handle_detect_ai(
    State(state): State<AppState>,
    Json(request): Json<DetectAiRequest>,
) -> Result<Json<AiDetectionReport>, AppError> {
    require("resume_yaml", &request.resume_yaml)?;

    let credentials = state.credentials(request.api_key.as_deref(), None)?;
    let report = detect_ai_patterns(state.llm.as_ref(), &credentials, &request.resume_yaml).await?;
    Ok(Json(report))
}

/// POST /generate_cover_letter
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    require("resume_yaml", &request.resume_yaml)?;

    let credentials = state.credentials(request.api_key.as_deref(), None)?;
    let (letter, usage) = generate_cover_letter(
        state.llm.as_ref(),
        &credentials,
        &request.resume_yaml,
        &request.job_description,
    )
    .await?;

    state
        .analytics
        .record(EventType::CoverLetterGenerated, usage_details(usage))
        .await;

    Ok(Json(letter))
}

/// POST /generate_outreach
pub async fn handle_generate_outreach(
    State(state): State<AppState>,
    Json(request): Json<OutreachRequest>,
) -> Result<Json<OutreachResponse>, AppError> {
    require("resume_yaml", &request.resume_yaml)?;

    let credentials = state.credentials(request.api_key.as_deref(), None)?;
    let (outreach, usage) = generate_outreach(state.llm.as_ref(), &credentials, &request).await?;

    let mut details = usage_details(usage);
    details.insert(
        "type".to_string(),
        Value::from(request.outreach_type.as_str()),
    );
    state
        .analytics
        .record(EventType::OutreachGenerated, details)
        .await;

    Ok(Json(outreach))
}

/// POST /generate_linkedin
pub async fn handle_generate_linkedin(
    State(state): State<AppState>,
    Json(request): Json<LinkedInRequest>,
) -> Result<Json<LinkedInResponse>, AppError> {
    require("resume_yaml", &request.resume_yaml)?;

    let credentials = state.credentials(request.api_key.as_deref(), None)?;
    let (linkedin, usage) = generate_linkedin(state.llm.as_ref(), &credentials, &request).await?;

    let mut details = usage_details(usage);
    details.insert("type".to_string(), Value::from(request.kind.as_str()));
    state
        .analytics
        .record(EventType::OutreachGenerated, details)
        .await;

    Ok(Json(linkedin))
}
