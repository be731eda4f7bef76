//! Lenient parsing of 0–100 scores returned by the LLM.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const MAX_SCORE: u32 = 100;

/// Accepts any JSON number or numeric string (an optional trailing `%` is
/// allowed), rounds it and clamps it to `0..=100`.
pub fn deserialize_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n.round().clamp(0.0, MAX_SCORE as f64) as u32),
        _ => Err(D::Error::custom(format!("expected a numeric score, got {value}"))),
    }
}
