//! Form engine error types.

use thiserror::Error;

use crate::field::FieldId;
use crate::validation::Violation;

/// Engine operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Configuration breaks a structural invariant and cannot be saved or rendered
    #[error("Configuration malformed: {0}")]
    ConfigurationMalformed(#[from] Malformed),

    /// No field with this id exists in the configuration
    #[error("Field '{0}' not found")]
    UnknownField(FieldId),

    /// Display-only fields hold no value
    #[error("Field '{0}' is display-only and holds no value")]
    NotAnInputField(FieldId),

    /// Value does not have the shape the field type dictates
    #[error("Field '{field}' expects a {expected} value")]
    ValueShape {
        field: FieldId,
        expected: &'static str,
    },
}

/// Structural problems detected before a configuration is saved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    #[error("tenant id is empty")]
    EmptyTenantId,

    #[error("a field has an empty id")]
    EmptyFieldId,

    #[error("field id '{0}' is used more than once")]
    DuplicateFieldId(FieldId),

    #[error("field '{0}' has no name")]
    MissingName(FieldId),

    #[error("field '{field}' reuses the name '{name}'")]
    DuplicateName { field: FieldId, name: String },

    #[error("select field '{0}' has no options")]
    EmptyOptions(FieldId),

    #[error("select field '{field}' lists option '{option}' more than once")]
    DuplicateOption { field: FieldId, option: String },

    #[error("default '{default}' of select field '{field}' is not one of its options")]
    DefaultNotInOptions { field: FieldId, default: String },

    #[error("pattern '{pattern}' of field '{field}' does not compile: {reason}")]
    InvalidPattern {
        field: FieldId,
        pattern: String,
        reason: String,
    },

    #[error("field '{field}' has min_length {min} greater than max_length {max}")]
    LengthBounds { field: FieldId, min: usize, max: usize },
}

/// Every violation found while validating a form, never just the first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation failed with {} violation(s)", .violations.len())]
pub struct ValidationFailure {
    /// Violations in field order
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the violations recorded against one field.
    pub fn for_field<'a>(&'a self, field: &'a FieldId) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| &v.field_id == field)
    }
}
