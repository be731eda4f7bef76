//! LLM-driven tailoring: résumé rewrite, ATS scoring, AI-pattern detection,
//! cover letters and outreach messages.
//!
//! Every flow builds a prompt from `prompts.rs`, goes through the
//! `TextGenerator` in `AppState`, and records usage analytics in the handler.

pub mod ats;
pub mod cleaning;
pub mod cover_letter;
pub mod detection;
pub mod handlers;
pub mod outreach;
pub mod prompts;
pub mod region;
pub mod rewrite;
pub mod scores;
