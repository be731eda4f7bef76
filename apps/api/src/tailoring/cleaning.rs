//! Cleans raw rewrite output before it reaches the repair pipeline.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref YAML_FENCE: Regex =
        Regex::new(r"(?s)```(?:yaml|yml)?[ \t]*\r?\n(.*?)```").expect("static regex");
}

/// Chat preambles shorter than this before `cv:` are treated as whitespace noise.
const PREAMBLE_LIMIT: usize = 50;

/// Extracts résumé YAML from an LLM reply.
///
/// Takes the first fenced block when there is one, drops a chatty preamble
/// before `cv:`, strips markdown bold markers (they parse as YAML aliases)
/// and trims.
pub fn clean_yaml_output(raw: &str) -> String {
    let mut text = match YAML_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().to_string(),
        None => raw.to_string(),
    };

    if let Some((preamble, rest)) = text.split_once("cv:") {
        if preamble.chars().count() >= PREAMBLE_LIMIT {
            text = format!("cv:{rest}");
        }
    }

    text.replace("**", "").trim().to_string()
}
