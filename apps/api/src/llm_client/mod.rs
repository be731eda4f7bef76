/// LLM Client: the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Handlers depend on the `TextGenerator` trait; `GeminiClient` is the
/// production implementation.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model used when a request does not name one, and the target of the
/// `gemini-3` / `flash` aliases.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Gemini API key is required")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// API key and model for a single request.
#[derive(Debug, Clone)]
pub struct LlmCredentials {
    pub api_key: String,
    pub model: String,
}

impl LlmCredentials {
    /// Picks the request's key over the configured one and resolves the model alias.
    pub fn resolve(
        request_key: Option<&str>,
        configured_key: Option<&str>,
        requested_model: Option<&str>,
        default_model: &str,
    ) -> Result<Self, LlmError> {
        let api_key = request_key
            .filter(|k| !k.trim().is_empty())
            .or(configured_key.filter(|k| !k.trim().is_empty()))
            .ok_or(LlmError::MissingApiKey)?;

        Ok(Self {
            api_key: api_key.trim().to_string(),
            model: resolve_model(requested_model, default_model),
        })
    }
}

/// Maps a client-supplied model name onto the name used in the API path.
///
/// Any `gemini-3` or `flash` variant is pinned to [`DEFAULT_MODEL`]; a
/// leading `models/` is dropped because the URL already carries it.
pub fn resolve_model(requested: Option<&str>, default_model: &str) -> String {
    let requested = requested.map(str::trim).unwrap_or_default();
    if requested.is_empty() {
        return default_model.trim_start_matches("models/").to_string();
    }
    if requested.contains("gemini-3") || requested.contains("flash") {
        return DEFAULT_MODEL.to_string();
    }
    requested.trim_start_matches("models/").to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Usage,
}

/// Anything that can turn a prompt into text. Carried in `AppState` as
/// `Arc<dyn TextGenerator>` so handlers can be exercised with a stub.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        credentials: &LlmCredentials,
        prompt: &str,
        system: &str,
    ) -> Result<LlmResponse, LlmError>;
}

/// Calls the generator and deserializes its text as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn call_json<T: DeserializeOwned>(
    llm: &dyn TextGenerator,
    credentials: &LlmCredentials,
    prompt: &str,
    system: &str,
) -> Result<(T, Usage), LlmError> {
    let response = llm.generate(credentials, prompt, system).await?;
    let text = strip_json_fences(&response.text);
    let value = serde_json::from_str(text)?;
    Ok((value, response.usage))
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate's parts.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }

    fn usage(&self) -> Usage {
        self.usage_metadata
            .as_ref()
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Production `TextGenerator` backed by the Gemini `generateContent` endpoint.
/// Retries 429 and 5xx responses with exponential backoff.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: &str) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        credentials: &LlmCredentials,
        prompt: &str,
        system: &str,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = GeminiRequest {
            system_instruction: (!system.is_empty()).then(|| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: system }],
            }),
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiPart { text: prompt }],
            }],
        };
        let url = self.endpoint(&credentials.model);

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &credentials.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let gemini: GeminiResponse = response.json().await?;
            let usage = gemini.usage();
            let text = gemini.text().ok_or(LlmError::EmptyContent)?;

            debug!(
                "LLM call succeeded: model={}, input_tokens={}, output_tokens={}",
                credentials.model, usage.input_tokens, usage.output_tokens
            );

            return Ok(LlmResponse { text, usage });
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
pub mod testing {
    //! Canned `TextGenerator` for handler tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays queued responses in order; errors once the queue is empty.
    #[derive(Default)]
    pub struct ScriptedGenerator {
        replies: Mutex<VecDeque<Result<String, u16>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new<I, S>(replies: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Queues an API failure with the given status code.
        pub fn then_fail(self, status: u16) -> Self {
            self.replies.lock().unwrap().push_back(Err(status));
            self
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _credentials: &LlmCredentials,
            prompt: &str,
            _system: &str,
        ) -> Result<LlmResponse, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(LlmResponse {
                    text,
                    usage: Usage {
                        input_tokens: 100,
                        output_tokens: 50,
                    },
                }),
                Some(Err(status)) => Err(LlmError::Api {
                    status,
                    message: "scripted failure".to_string(),
                }),
                None => Err(LlmError::EmptyContent),
            }
        }
    }
}
