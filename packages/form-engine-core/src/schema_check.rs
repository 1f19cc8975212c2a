//! Structural checks run before a configuration is saved or rendered.

use std::collections::HashSet;

use crate::error::{EngineError, Malformed};
use crate::field::{Field, FieldSpec, FieldValidation};
use crate::validation::compile_pattern;

pub(crate) fn check_tenant(tenant_id: &str) -> Result<(), EngineError> {
    if tenant_id.trim().is_empty() {
        return Err(Malformed::EmptyTenantId.into());
    }
    Ok(())
}

/// Validates field identity, naming and per-kind constraints.
///
/// # Arguments
/// * `fields` - Fields in render order
///
/// # Returns
/// `Result<(), EngineError>` indicating success or the first structural problem.
pub(crate) fn check_fields(fields: &[Field]) -> Result<(), EngineError> {
    let mut seen_ids = HashSet::new();
    let mut seen_names = HashSet::new();

    for field in fields {
        if field.id.is_empty() {
            return Err(Malformed::EmptyFieldId.into());
        }
        if !seen_ids.insert(&field.id) {
            return Err(Malformed::DuplicateFieldId(field.id.clone()).into());
        }

        if let Some(name) = field.name() {
            if name.trim().is_empty() {
                return Err(Malformed::MissingName(field.id.clone()).into());
            }
            if !seen_names.insert(name) {
                return Err(Malformed::DuplicateName {
                    field: field.id.clone(),
                    name: name.to_string(),
                }
                .into());
            }
        }

        if let FieldSpec::Select(select) = &field.spec {
            check_options(field, &select.options, select.default.as_deref())?;
        }

        if let Some(validation) = field.validation() {
            check_validation(field, validation)?;
        }
    }

    Ok(())
}

fn check_options(field: &Field, options: &[String], default: Option<&str>) -> Result<(), EngineError> {
    if options.is_empty() {
        return Err(Malformed::EmptyOptions(field.id.clone()).into());
    }

    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.as_str()) {
            return Err(Malformed::DuplicateOption {
                field: field.id.clone(),
                option: option.clone(),
            }
            .into());
        }
    }

    // An empty default means "nothing selected"
    if let Some(default) = default.filter(|d| !d.is_empty()) {
        if !seen.contains(default) {
            return Err(Malformed::DefaultNotInOptions {
                field: field.id.clone(),
                default: default.to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn check_validation(field: &Field, validation: &FieldValidation) -> Result<(), EngineError> {
    if let (Some(min), Some(max)) = (validation.min_length, validation.max_length) {
        if min > max {
            return Err(Malformed::LengthBounds {
                field: field.id.clone(),
                min,
                max,
            }
            .into());
        }
    }

    if let Some(pattern) = &validation.pattern {
        compile_pattern(pattern).map_err(|e| Malformed::InvalidPattern {
            field: field.id.clone(),
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}
