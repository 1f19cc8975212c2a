//! Per-field validation of candidate values.

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::field::{Field, FieldId, FieldSpec, FieldValidation};
use crate::value::FieldValue;

/// Rule a value failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum ViolationKind {
    MissingRequired,
    TooShort,
    TooLong,
    PatternMismatch,
}

/// A single rule failure for one field and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field_id: FieldId,
    pub field_name: String,
    pub kind: ViolationKind,
    pub message: String,
}

/// Compiles a field pattern so that it must match the whole value.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Validates a candidate value against a field's rules.
///
/// Display fields never produce violations. Every applicable rule is
/// evaluated, so a single bad value may yield several violations. Fields
/// without a validation block carry no constraints.
///
/// # Arguments
/// * `field` - Field description
/// * `value` - Candidate value, `None` when absent
///
/// # Returns
/// All violations found, empty when the value is acceptable.
pub fn validate(field: &Field, value: Option<&FieldValue>) -> Vec<Violation> {
    let mut violations = Vec::new();
    match &field.spec {
        FieldSpec::Header(_) | FieldSpec::Static(_) => {}
        FieldSpec::Text(text) => {
            if let Some(rules) = &text.validation {
                let checker = Checker::new(field, &text.name, &text.label);
                checker.check_text(rules, value, &mut violations);
            }
        }
        FieldSpec::Select(select) => {
            if let Some(rules) = &select.validation {
                let checker = Checker::new(field, &select.name, &select.label);
                checker.check_text(rules, value, &mut violations);
            }
        }
        FieldSpec::Checkbox(checkbox) => {
            if let Some(rules) = &checkbox.validation {
                let checker = Checker::new(field, &checkbox.name, &checkbox.label);
                checker.check_checkbox(rules, value, &mut violations);
            }
        }
    }
    violations
}

struct Checker<'a> {
    field: &'a Field,
    name: &'a str,
    label: &'a str,
}

impl<'a> Checker<'a> {
    fn new(field: &'a Field, name: &'a str, label: &'a str) -> Self {
        Self { field, name, label }
    }

    fn display_name(&self) -> &str {
        if self.label.is_empty() {
            self.name
        } else {
            self.label
        }
    }

    fn violation(&self, kind: ViolationKind, message: String) -> Violation {
        Violation {
            field_id: self.field.id.clone(),
            field_name: self.name.to_string(),
            kind,
            message,
        }
    }

    fn missing(&self) -> Violation {
        self.violation(
            ViolationKind::MissingRequired,
            format!("{} is required", self.display_name()),
        )
    }

    /// Text and select values: required, length bounds and pattern.
    fn check_text(&self, rules: &FieldValidation, value: Option<&FieldValue>, out: &mut Vec<Violation>) {
        // A value of the wrong shape counts as absent
        let Some(raw) = value.and_then(FieldValue::as_text) else {
            if rules.required {
                out.push(self.missing());
            }
            return;
        };

        let text = raw.trim();
        if text.is_empty() {
            if !rules.required {
                return;
            }
            out.push(self.missing());
        }

        let length = text.chars().count();
        if let Some(min) = rules.min_length {
            if length < min {
                out.push(self.violation(
                    ViolationKind::TooShort,
                    format!(
                        "{} must be at least {} characters (got {})",
                        self.display_name(),
                        min,
                        length
                    ),
                ));
            }
        }
        if let Some(max) = rules.max_length {
            if length > max {
                out.push(self.violation(
                    ViolationKind::TooLong,
                    format!(
                        "{} must be at most {} characters (got {})",
                        self.display_name(),
                        max,
                        length
                    ),
                ));
            }
        }

        if let Some(pattern) = &rules.pattern {
            match compile_pattern(pattern) {
                Ok(regex) => {
                    if !regex.is_match(text) {
                        out.push(self.violation(
                            ViolationKind::PatternMismatch,
                            format!("{} does not match the expected format", self.display_name()),
                        ));
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        field = %self.field.id,
                        pattern = %pattern,
                        "Field pattern does not compile: {}",
                        e
                    );
                    out.push(self.violation(
                        ViolationKind::PatternMismatch,
                        format!(
                            "{} cannot be checked: pattern '{}' is not a valid regular expression",
                            self.display_name(),
                            pattern
                        ),
                    ));
                }
            }
        }
    }

    /// Required checkboxes must be checked.
    fn check_checkbox(&self, rules: &FieldValidation, value: Option<&FieldValue>, out: &mut Vec<Violation>) {
        let checked = value.and_then(FieldValue::as_bool).unwrap_or(false);
        if rules.required && !checked {
            out.push(self.violation(
                ViolationKind::MissingRequired,
                format!("{} must be checked", self.display_name()),
            ));
        }
    }
}
