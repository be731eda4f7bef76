//! Cover letter text generation.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{call_json, LlmCredentials, TextGenerator, Usage};
use crate::tailoring::prompts::COVER_LETTER_PROMPT_TEMPLATE;

#[derive(Debug, Clone, Deserialize)]
pub struct CoverLetterRequest {
    pub job_description: String,
    pub resume_yaml: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetterResponse {
    pub cover_letter_text: String,
}

pub async fn generate_cover_letter(
    llm: &dyn TextGenerator,
    credentials: &LlmCredentials,
    resume_yaml: &str,
    job_description: &str,
) -> Result<(CoverLetterResponse, Usage), AppError> {
    let prompt = COVER_LETTER_PROMPT_TEMPLATE
        .replace("{resume_yaml}", resume_yaml)
        .replace("{job_description}", job_description);

    let (letter, usage) =
        call_json::<CoverLetterResponse>(llm, credentials, &prompt, JSON_ONLY_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Cover letter generation failed: {e}")))?;

    if letter.cover_letter_text.trim().is_empty() {
        return Err(AppError::Llm("Cover letter was empty".to_string()));
    }
    Ok((letter, usage))
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
    async fn test_returns_letter_text() {
        let llm = ScriptedGenerator::new([
            r#"{"cover_letter_text": "Dear Hiring Team,\n\nI build reliable systems."}"#,
        ]);
        let (letter, usage) = generate_cover_letter(&llm, &credentials(), "cv: {}", "Acme needs Rust")
            .await
            .unwrap();
        assert!(letter.cover_letter_text.starts_with("Dear Hiring Team"));
        assert_eq!(usage.output_tokens, 50);
        assert!(llm.prompts.lock().unwrap()[0].contains("Acme needs Rust"));
    }

    #[tokio::test]
    async fn test_empty_letter_is_an_error() {
        let llm = ScriptedGenerator::new([r#"{"cover_letter_text": "  "}"#]);
        let result = generate_cover_letter(&llm, &credentials(), "cv: {}", "jd").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
