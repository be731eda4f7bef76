//! Résumé rewrite: orchestrates keyword extraction, the rewrite call and repair.
//!
//! Flow: extract keywords (best-effort) → build region-aware prompt →
//!       LLM rewrite → clean output → repair pipeline → response.
//!
//! A fatal repair failure does not fail the request: the cleaned text is
//! returned as-is and RenderCV reports whatever is still wrong at render time.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::document::{repair_yaml, RepairReport};
use crate::errors::AppError;
use crate::llm_client::prompts::{giveaway_word_list, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, LlmCredentials, TextGenerator, Usage};
use crate::tailoring::cleaning::clean_yaml_output;
use crate::tailoring::prompts::{
    CUSTOM_INSTRUCTIONS_TEMPLATE, KEYWORDS_PROMPT_TEMPLATE, REWRITE_PROMPT_TEMPLATE,
    REWRITE_SYSTEM,
};
use crate::tailoring::region::TargetRegion;

/// Request body for `POST /rewrite`.
#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRequest {
    pub job_description: String,
    pub current_yaml: String,
    #[serde(default)]
    pub target_region: TargetRegion,
    #[serde(default)]
    pub user_comments: String,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Response body for `POST /rewrite`.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteResponse {
    pub yaml: String,
    pub keywords: Vec<String>,
    /// `None` when the output could not be repaired and is returned as cleaned.
    pub repairs: Option<RepairReport>,
}

/// Rewrite result plus token usage of the rewrite call, for analytics.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    pub response: RewriteResponse,
    pub usage: Usage,
}

/// Runs the full rewrite flow for one request.
pub async fn rewrite_resume(
    llm: &dyn TextGenerator,
    credentials: &LlmCredentials,
    request: &RewriteRequest,
) -> Result<RewriteOutcome, AppError> {
    // Step 1: keywords (failure is tolerated)
    let keywords = extract_keywords(llm, credentials, &request.job_description).await;

    // Step 2: rewrite
    let prompt = build_rewrite_prompt(request, &keywords)?;
    let response = llm
        .generate(credentials, &prompt, REWRITE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("AI rewrite failed: {e}")))?;

    // Step 3: clean
    let cleaned = clean_yaml_output(&response.text);

    // Step 4: repair, falling back to the cleaned text
    let (yaml, repairs) = match repair_yaml(&cleaned) {
        Ok(repaired) => (repaired.yaml, Some(repaired.report)),
        Err(e) => {
            warn!("Post-process YAML repair failed, returning cleaned output: {e}");
            (cleaned, None)
        }
    };

    info!(
        "Rewrote resume: region={}, model={}, keywords={}, repaired={}",
        request.target_region.as_str(),
        credentials.model,
        keywords.len(),
        repairs.is_some()
    );

    Ok(RewriteOutcome {
        response: RewriteResponse {
            yaml,
            keywords,
            repairs,
        },
        usage: response.usage,
    })
}

/// Asks the LLM for the job description's key terms. Returns an empty list on any failure.
pub async fn extract_keywords(
    llm: &dyn TextGenerator,
    credentials: &LlmCredentials,
    job_description: &str,
) -> Vec<String> {
    let prompt = KEYWORDS_PROMPT_TEMPLATE.replace("{job_description}", job_description);
    match call_json::<Vec<String>>(llm, credentials, &prompt, JSON_ONLY_SYSTEM).await {
        Ok((keywords, _)) => {
            debug!("Extracted keywords: {keywords:?}");
            keywords
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect()
        }
        Err(e) => {
            warn!("Keyword extraction failed, proceeding with generic rewrite: {e}");
            Vec::new()
        }
    }
}

fn build_rewrite_prompt(request: &RewriteRequest, keywords: &[String]) -> Result<String, AppError> {
    let keywords_json = serde_json::to_string(keywords)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize keywords: {e}")))?;

    let custom_instructions = if request.user_comments.trim().is_empty() {
        String::new()
    } else {
        CUSTOM_INSTRUCTIONS_TEMPLATE.replace("{user_comments}", request.user_comments.trim())
    };

    Ok(REWRITE_PROMPT_TEMPLATE
        .replace("{keywords}", &keywords_json)
        .replace("{banned_words}", &giveaway_word_list())
        .replace("{region_instructions}", request.target_region.instructions())
        .replace("{custom_instructions}", &custom_instructions)
        .replace("{job_description}", &request.job_description)
        .replace("{current_yaml}", &request.current_yaml))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::llm_client::DEFAULT_MODEL;

    fn credentials() -> LlmCredentials {
        LlmCredentials {
            api_key: "test-key".to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    fn request(region: &str, comments: &str) -> RewriteRequest {
        serde_json::from_value(serde_json::json!({
            "job_description": "Senior Rust engineer. Tokio, Axum, PostgreSQL.",
            "current_yaml": "cv:\n  name: Ada\n",
            "target_region": region,
            "user_comments": comments,
        }))
        .unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let request: RewriteRequest = serde_json::from_value(serde_json::json!({
            "job_description": "jd",
            "current_yaml": "cv: {}"
        }))
        .unwrap();
        assert_eq!(request.target_region, TargetRegion::International);
        assert!(request.user_comments.is_empty());
        assert!(request.api_key.is_none());
    }

    #[test]
    fn test_prompt_contains_inputs_and_region() {
        let prompt = build_rewrite_prompt(&request("uk", ""), &["Rust".to_string()]).unwrap();
        assert!(prompt.contains("[\"Rust\"]"));
        assert!(prompt.contains("Senior Rust engineer"));
        assert!(prompt.contains("cv:\n  name: Ada"));
        assert!(prompt.contains("REGION: UNITED KINGDOM"));
        assert!(!prompt.contains("USER INSTRUCTIONS"));
        assert!(!prompt.contains("{custom_instructions}"));
    }

    #[test]
    fn test_prompt_includes_user_comments() {
        let prompt = build_rewrite_prompt(&request("usa", "Keep it to one page"), &[]).unwrap();
        assert!(prompt.contains("USER INSTRUCTIONS"));
        assert!(prompt.contains("Keep it to one page"));
    }

    #[tokio::test]
    async fn test_rewrite_repairs_model_output() {
        let llm = ScriptedGenerator::new([
            "[\"Rust\", \"Tokio\"]",
            "Here is the tailored resume you asked for, matching the job:\n```yaml\ncv:\n  basics:\n    email: ada@example.com\n  phone: 5551234\n  sections:\n    experience:\n      - company: Acme\n        end_date: Current\n```",
        ]);
        let outcome = rewrite_resume(&llm, &credentials(), &request("international", ""))
            .await
            .unwrap();

        let value: serde_yaml::Value = serde_yaml::from_str(&outcome.response.yaml).unwrap();
        assert_eq!(value["cv"]["email"], serde_yaml::Value::from("ada@example.com"));
        assert_eq!(value["cv"]["phone"], serde_yaml::Value::from("5551234"));
        assert_eq!(
            value["cv"]["sections"]["experience"][0]["end_date"],
            serde_yaml::Value::from("present")
        );
        assert_eq!(outcome.response.keywords, vec!["Rust", "Tokio"]);
        assert!(outcome.response.repairs.is_some());
        assert_eq!(outcome.usage.input_tokens, 100);
    }

    #[tokio::test]
    async fn test_keyword_failure_does_not_block_rewrite() {
        let llm = ScriptedGenerator::new(["not json at all", "cv:\n  name: Ada\n"]);
        let outcome = rewrite_resume(&llm, &credentials(), &request("germany", ""))
            .await
            .unwrap();
        assert!(outcome.response.keywords.is_empty());
        assert!(outcome.response.yaml.contains("name: Ada"));
    }

    #[tokio::test]
    async fn test_unrepairable_output_is_returned_cleaned() {
        let llm = ScriptedGenerator::new(["[]", "I cannot help with **that** request."]);
        let outcome = rewrite_resume(&llm, &credentials(), &request("usa", ""))
            .await
            .unwrap();
        assert_eq!(outcome.response.yaml, "I cannot help with that request.");
        assert!(outcome.response.repairs.is_none());
    }

    #[tokio::test]
    async fn test_oversized_integer_falls_back_to_cleaned_output() {
        let llm = ScriptedGenerator::new([
            "[]",
            "```yaml\ncv:\n  name: Ada\n  phone: 123456789012345678901\n```",
        ]);
        let outcome = rewrite_resume(&llm, &credentials(), &request("usa", ""))
            .await
            .unwrap();
        assert_eq!(
            outcome.response.yaml,
            "cv:\n  name: Ada\n  phone: 123456789012345678901"
        );
        assert!(outcome.response.repairs.is_none());
    }

    #[tokio::test]
    async fn test_rewrite_call_failure_is_an_error() {
        let llm = ScriptedGenerator::new(["[]"]).then_fail(500);
        let result = rewrite_resume(&llm, &credentials(), &request("usa", "")).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
