//! Section shape fixer.
//!
//! RenderCV sections are homogeneous sequences of entries. Models like to
//! write `references: References available upon request` as a bare string;
//! wrapping it turns it into a one-item TextEntry section.

use serde_yaml::{Mapping, Value};

use super::pipeline::{RepairStep, StepSkipped};

const SECTIONS_KEY: &str = "sections";

/// Sections that models commonly emit as a single string.
pub const TEXT_SECTIONS: [&str; 2] = ["references", "signature"];

/// Outcome of inspecting the known text sections.
#[derive(Debug, Default)]
pub struct SectionFixes {
    /// Sections that were wrapped into a one-element sequence.
    pub wrapped: Vec<String>,
    /// Sections left alone because their shape was unrecognized.
    pub skipped: Vec<StepSkipped>,
}

/// Wraps bare-string text sections under `cv.sections` into sequences.
///
/// Sequences and absent sections are left as they are. Any other shape is
/// reported as skipped and left for RenderCV's own validation to reject.
pub fn wrap_text_sections(cv: &mut Mapping) -> Result<SectionFixes, StepSkipped> {
    let sections = match cv.get_mut(SECTIONS_KEY) {
        None | Some(Value::Null) => return Ok(SectionFixes::default()),
        Some(Value::Mapping(sections)) => sections,
        Some(_) => {
            return Err(StepSkipped::new(
                RepairStep::SectionShape,
                "`cv.sections` is not a mapping",
            ))
        }
    };

    let mut fixes = SectionFixes::default();
    for name in TEXT_SECTIONS {
        let Some(section) = sections.get_mut(name) else {
            continue;
        };
        match section {
            Value::String(text) => {
                let text = std::mem::take(text);
                *section = Value::Sequence(vec![Value::String(text)]);
                fixes.wrapped.push(name.to_string());
            }
            Value::Sequence(_) => {}
            other => fixes.skipped.push(StepSkipped::new(
                RepairStep::SectionShape,
                format!(
                    "`cv.sections.{name}` is {}, expected a string or a list",
                    describe(other)
                ),
            )),
        }
    }
    Ok(fixes)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "empty",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
