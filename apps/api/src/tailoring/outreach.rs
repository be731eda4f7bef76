//! Outreach drafting: cold email sequences, follow-ups and LinkedIn notes.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::prompts::{excerpt, JSON_ONLY_SYSTEM, PLAIN_TEXT_SYSTEM};
use crate::llm_client::{strip_json_fences, LlmCredentials, TextGenerator, Usage};
use crate::tailoring::prompts::{
    COLD_EMAIL_PROMPT_TEMPLATE, CONNECTION_CONSTRAINTS, CONNECTION_KIND, FOLLOW_UP_TASK,
    LINKEDIN_PROMPT_TEMPLATE, LINKEDIN_TASK, MESSAGE_CONSTRAINTS, MESSAGE_KIND,
    SINGLE_MESSAGE_PROMPT_TEMPLATE,
};

const COLD_EMAIL_RESUME_CHARS: usize = 2000;
const SINGLE_MESSAGE_RESUME_CHARS: usize = 1000;
const SINGLE_MESSAGE_JD_CHARS: usize = 1000;
const LINKEDIN_RESUME_CHARS: usize = 1500;
const LINKEDIN_JD_CHARS: usize = 500;
/// LinkedIn's connection note limit.
pub const CONNECTION_NOTE_LIMIT: usize = 300;

// ────────────────────────────────────────────────────────────────────────────
// Email-style outreach
// ────────────────────────────────────────────────────────────────────────────

fn default_outreach_type() -> String {
    "linkedin".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutreachRequest {
    pub job_description: String,
    pub resume_yaml: String,
    /// `linkedin`, `cold_email` or `follow_up`.
    #[serde(default = "default_outreach_type")]
    pub outreach_type: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachEmail {
    pub label: String,
    #[serde(default)]
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachResponse {
    pub emails: Vec<OutreachEmail>,
}

pub async fn generate_outreach(
    llm: &dyn TextGenerator,
    credentials: &LlmCredentials,
    request: &OutreachRequest,
) -> Result<(OutreachResponse, Usage), AppError> {
    let prompt = build_outreach_prompt(request);
    let response = llm
        .generate(credentials, &prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Outreach generation failed: {e}")))?;

    let outreach = match serde_json::from_str::<OutreachResponse>(strip_json_fences(&response.text))
    {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Outreach reply was not JSON, wrapping raw text: {e}");
            OutreachResponse {
                emails: vec![OutreachEmail {
                    label: "Generated Message".to_string(),
                    subject: "Outreach".to_string(),
                    body: response.text.clone(),
                }],
            }
        }
    };
    Ok((outreach, response.usage))
}

fn build_outreach_prompt(request: &OutreachRequest) -> String {
    if request.outreach_type == "cold_email" {
        return COLD_EMAIL_PROMPT_TEMPLATE
            .replace(
                "{resume_excerpt}",
                excerpt(&request.resume_yaml, COLD_EMAIL_RESUME_CHARS),
            )
            .replace("{job_description}", &request.job_description);
    }

    let task = match request.outreach_type.as_str() {
        "follow_up" => FOLLOW_UP_TASK,
        _ => LINKEDIN_TASK,
    };
    SINGLE_MESSAGE_PROMPT_TEMPLATE
        .replace("{task}", task)
        .replace("{label}", &capitalize(&request.outreach_type))
        .replace(
            "{resume_excerpt}",
            excerpt(&request.resume_yaml, SINGLE_MESSAGE_RESUME_CHARS),
        )
        .replace(
            "{job_description}",
            excerpt(&request.job_description, SINGLE_MESSAGE_JD_CHARS),
        )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LinkedIn notes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkedInKind {
    #[default]
    Connection,
    Message,
}

impl LinkedInKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkedInKind::Connection => "connection",
            LinkedInKind::Message => "message",
        }
    }
}

/// Anything other than `connection` is drafted as a full message.
impl<'de> Deserialize<'de> for LinkedInKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(match name.trim() {
            "connection" => LinkedInKind::Connection,
            _ => LinkedInKind::Message,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkedInRequest {
    pub resume_yaml: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub recruiters_name: String,
    #[serde(default)]
    pub recruiters_role: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default, rename = "type")]
    pub kind: LinkedInKind,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedInResponse {
    pub content: String,
}

pub async fn generate_linkedin(
    llm: &dyn TextGenerator,
    credentials: &LlmCredentials,
    request: &LinkedInRequest,
) -> Result<(LinkedInResponse, Usage), AppError> {
    let prompt = build_linkedin_prompt(request);
    let response = llm
        .generate(credentials, &prompt, PLAIN_TEXT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("LinkedIn message generation failed: {e}")))?;

    let mut content = response.text.trim().replace('"', "");
    if request.kind == LinkedInKind::Connection {
        content = excerpt(&content, CONNECTION_NOTE_LIMIT).trim_end().to_string();
    }
    Ok((LinkedInResponse { content }, response.usage))
}

fn build_linkedin_prompt(request: &LinkedInRequest) -> String {
    let (kind, constraints) = match request.kind {
        LinkedInKind::Connection => (CONNECTION_KIND, CONNECTION_CONSTRAINTS),
        LinkedInKind::Message => (MESSAGE_KIND, MESSAGE_CONSTRAINTS),
    };

    LINKEDIN_PROMPT_TEMPLATE
        .replace("{kind}", kind)
        .replace("{constraints}", constraints)
        .replace(
            "{recruiter_name}",
            or_default(&request.recruiters_name, "Hiring Manager"),
        )
        .replace(
            "{recruiter_role}",
            or_default(&request.recruiters_role, "Recruiter"),
        )
        .replace("{company}", or_default(&request.company_name, "the company"))
        .replace(
            "{job_excerpt}",
            excerpt(&request.job_description, LINKEDIN_JD_CHARS),
        )
        .replace(
            "{resume_excerpt}",
            excerpt(&request.resume_yaml, LINKEDIN_RESUME_CHARS),
        )
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value.trim()
    }
}
