//! Repair pipeline orchestration.
//!
//! Flow: parse → ensure `cv` root → lift basics → canonicalize open-ended
//! dates → wrap text sections → coerce phone → serialize.
//!
//! Only a parse failure or an unrecognizable root is fatal. Every later step
//! is best-effort: a step that meets a shape it does not understand records
//! a [`StepSkipped`] and the remaining steps still run. RenderCV performs the
//! final schema validation.

use serde::Serialize;
use tracing::{debug, warn};

use super::canonicalize::canonicalize_open_ended;
use super::coerce::coerce_phone;
use super::normalize::{ensure_cv_root, lift_basics};
use super::sections::wrap_text_sections;
use super::{Document, DocumentError, CV_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStep {
    FieldNormalize,
    SectionShape,
    PhoneCoerce,
}

/// A repair step that left part of the document alone because of its shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSkipped {
    pub step: RepairStep,
    pub reason: String,
}

impl StepSkipped {
    pub fn new(step: RepairStep, reason: impl Into<String>) -> Self {
        Self {
            step,
            reason: reason.into(),
        }
    }
}

/// What a single pipeline run changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepairReport {
    pub wrapped_root: bool,
    pub lifted_fields: Vec<String>,
    pub canonicalized_dates: usize,
    pub wrapped_sections: Vec<String>,
    pub phone_coerced: bool,
    pub skipped: Vec<StepSkipped>,
}

impl RepairReport {
    /// True when the run modified the document.
    pub fn changed(&self) -> bool {
        self.wrapped_root
            || !self.lifted_fields.is_empty()
            || self.canonicalized_dates > 0
            || !self.wrapped_sections.is_empty()
            || self.phone_coerced
    }
}

/// Repaired YAML text together with the report of what was done.
#[derive(Debug, Clone)]
pub struct RepairedYaml {
    pub yaml: String,
    pub report: RepairReport,
}

/// Parses, repairs and re-serializes LLM-produced résumé YAML.
pub fn repair_yaml(text: &str) -> Result<RepairedYaml, DocumentError> {
    let mut document = Document::parse(text)?;
    let report = repair_document(&mut document)?;
    let yaml = document.to_yaml()?;
    Ok(RepairedYaml { yaml, report })
}

/// Runs the repair steps in place on an already-parsed document.
pub fn repair_document(document: &mut Document) -> Result<RepairReport, DocumentError> {
    let mut report = RepairReport {
        wrapped_root: ensure_cv_root(document.root_mut())
            .map_err(DocumentError::StructureMismatch)?,
        ..RepairReport::default()
    };

    match document.cv_mut() {
        Some(cv) => match lift_basics(cv) {
            Ok(lifted) => report.lifted_fields = lifted,
            Err(skipped) => report.skipped.push(skipped),
        },
        None => report.skipped.push(cv_not_mapping(RepairStep::FieldNormalize)),
    }

    // Runs over the whole tree before sections are inspected.
    report.canonicalized_dates = canonicalize_open_ended(document.root_mut());

    match document.cv_mut() {
        Some(cv) => match wrap_text_sections(cv) {
            Ok(fixes) => {
                report.wrapped_sections = fixes.wrapped;
                report.skipped.extend(fixes.skipped);
            }
            Err(skipped) => report.skipped.push(skipped),
        },
        None => report.skipped.push(cv_not_mapping(RepairStep::SectionShape)),
    }

    match document.cv_mut() {
        Some(cv) => match coerce_phone(cv) {
            Ok(changed) => report.phone_coerced = changed,
            Err(skipped) => report.skipped.push(skipped),
        },
        None => report.skipped.push(cv_not_mapping(RepairStep::PhoneCoerce)),
    }

    for skipped in &report.skipped {
        warn!("Repair step {:?} skipped: {}", skipped.step, skipped.reason);
    }
    if report.changed() {
        debug!(
            "Document repair: wrapped_root={} lifted={:?} dates={} sections={:?} phone={}",
            report.wrapped_root,
            report.lifted_fields,
            report.canonicalized_dates,
            report.wrapped_sections,
            report.phone_coerced
        );
    }

    Ok(report)
}

fn cv_not_mapping(step: RepairStep) -> StepSkipped {
    StepSkipped::new(step, format!("`{CV_KEY}` is not a mapping"))
}
