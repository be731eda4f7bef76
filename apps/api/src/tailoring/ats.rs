//! ATS scoring: asks the LLM to grade a résumé against a job description.
//!
//! Scoring is advisory: any LLM or JSON failure yields a zero-score fallback
//! report instead of an error, so the UI can always render something.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{call_json, LlmCredentials, TextGenerator};
use crate::tailoring::prompts::ATS_PROMPT_TEMPLATE;
use crate::tailoring::scores::deserialize_score;

#[derive(Debug, Clone, Deserialize)]
pub struct AtsRequest {
    pub job_description: String,
    pub resume_yaml: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsReport {
    #[serde(default, deserialize_with = "deserialize_score")]
    pub score: u32, // 0 – 100
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub formatting_check: String,
}

impl AtsReport {
    pub fn fallback() -> Self {
        Self {
            score: 0,
            feedback: "Could not calculate ATS score due to AI response error.".to_string(),
            missing_keywords: Vec::new(),
            formatting_check: "Unknown".to_string(),
        }
    }
}

pub async fn score_resume(
    llm: &dyn TextGenerator,
    credentials: &LlmCredentials,
    resume_yaml: &str,
    job_description: &str,
) -> AtsReport {
    let prompt = ATS_PROMPT_TEMPLATE
        .replace("{resume_yaml}", resume_yaml)
        .replace("{job_description}", job_description);

    match call_json::<AtsReport>(llm, credentials, &prompt, JSON_ONLY_SYSTEM).await {
        Ok((report, _)) => report,
        Err(e) => {
            warn!("ATS scoring failed, returning fallback report: {e}");
            AtsReport::fallback()
        }
    }
}
