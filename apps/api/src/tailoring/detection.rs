//! AI-pattern detection: flags phrasing that reads as machine-written.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::{giveaway_word_list, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, LlmCredentials, TextGenerator};
use crate::tailoring::prompts::DETECT_AI_PROMPT_TEMPLATE;
use crate::tailoring::scores::deserialize_score;

#[derive(Debug, Clone, Deserialize)]
pub struct DetectAiRequest {
    pub resume_yaml: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedPhrase {
    pub phrase: String,
    #[serde(default)]
    pub suggestion: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiDetectionReport {
    #[serde(deserialize_with = "deserialize_score")]
    pub human_score: u32,
    #[serde(default)]
    pub items: Vec<FlaggedPhrase>,
    #[serde(default)]
    pub summary: String,
}

pub async fn detect_ai_patterns(
    llm: &dyn TextGenerator,
    credentials: &LlmCredentials,
    resume_yaml: &str,
) -> Result<AiDetectionReport, AppError> {
    let prompt = DETECT_AI_PROMPT_TEMPLATE
        .replace("{banned_words}", &giveaway_word_list())
        .replace("{resume_yaml}", resume_yaml);

    let (report, usage) =
        call_json::<AiDetectionReport>(llm, credentials, &prompt, JSON_ONLY_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("AI detection failed: {e}")))?;

    tracing::debug!(
        "AI detection: human_score={}, flagged={}, output_tokens={}",
        report.human_score,
        report.items.len(),
        usage.output_tokens
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::llm_client::DEFAULT_MODEL;

    fn credentials() -> LlmCredentials {
        LlmCredentials {
            api_key: "k".to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    #[tokio::test]
    async fn test_parses_flagged_phrases() {
        let llm = ScriptedGenerator::new([r#"```json
{"human_score": 64, "items": [{"phrase": "spearheaded", "suggestion": "led", "reason": "Buzzword"}], "summary": "Some cliches."}
```"#]);
        let report = detect_ai_patterns(&llm, &credentials(), "cv: {}").await.unwrap();
        assert_eq!(report.human_score, 64);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].suggestion, "led");

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("\"spearheaded\""));
    }

    #[tokio::test]
    async fn test_fractional_human_score_is_rounded() {
        let llm = ScriptedGenerator::new([
            r#"{"human_score": 72.5, "items": [], "summary": "Mostly natural."}"#,
        ]);
        let report = detect_ai_patterns(&llm, &credentials(), "cv: {}").await.unwrap();
        assert_eq!(report.human_score, 73);
        assert_eq!(report.summary, "Mostly natural.");
    }

    #[tokio::test]
    async fn test_string_and_out_of_range_human_scores() {
        let llm = ScriptedGenerator::new([r#"{"human_score": "64"}"#]);
        let report = detect_ai_patterns(&llm, &credentials(), "cv: {}").await.unwrap();
        assert_eq!(report.human_score, 64);

        let llm = ScriptedGenerator::new([r#"{"human_score": 130}"#]);
        let report = detect_ai_patterns(&llm, &credentials(), "cv: {}").await.unwrap();
        assert_eq!(report.human_score, 100);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_an_error() {
        let llm = ScriptedGenerator::new(["Looks human to me."]);
        let result = detect_ai_patterns(&llm, &credentials(), "cv: {}").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
