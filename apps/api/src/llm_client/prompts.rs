// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for free-text outputs (messages, letters).
pub const PLAIN_TEXT_SYSTEM: &str = "You are an experienced career coach and writer. \
    Respond with the requested text only. \
    Do NOT use markdown formatting. \
    Do NOT add commentary before or after the text.";

/// Words that read as machine-written in résumés and outreach.
pub const AI_GIVEAWAY_WORDS: &[&str] = &[
    "spearheaded",
    "orchestrated",
    "navigating",
    "meticulous",
    "paramount",
    "delve",
    "tapestry",
    "unleashed",
    "transformative",
    "foster",
    "leverage",
    "utilizing",
    "showcasing",
    "ensuring",
    "facilitated",
    "augmenting",
];

/// Renders [`AI_GIVEAWAY_WORDS`] as a quoted, comma-separated list for prompts.
pub fn giveaway_word_list() -> String {
    AI_GIVEAWAY_WORDS
        .iter()
        .map(|w| format!("\"{w}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Truncates `text` to at most `max_chars` characters on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
