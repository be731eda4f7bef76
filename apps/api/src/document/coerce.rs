//! Type coercion for fields RenderCV validates as strings.

use serde_yaml::{Mapping, Value};

use super::pipeline::{RepairStep, StepSkipped};

const PHONE_KEY: &str = "phone";

/// Text form of a scalar value; `None` for null and collections.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Forces `cv.phone` to a string. Returns `true` when the value changed.
///
/// Numbers and booleans use their display form, null becomes the empty
/// string and collections are serialized to YAML text.
pub fn coerce_phone(cv: &mut Mapping) -> Result<bool, StepSkipped> {
    let Some(phone) = cv.get_mut(PHONE_KEY) else {
        return Ok(false);
    };
    if phone.is_string() {
        return Ok(false);
    }

    let text = match scalar_text(phone) {
        Some(text) => text,
        None if phone.is_null() => String::new(),
        None => serde_yaml::to_string(phone)
            .map(|yaml| yaml.trim_end().to_string())
            .map_err(|e| {
                StepSkipped::new(
                    RepairStep::PhoneCoerce,
                    format!("`cv.phone` could not be rendered as text: {e}"),
                )
            })?,
    };
    *phone = Value::String(text);
    Ok(true)
}
