//! Schema-driven form engine.
//!
//! Provides the field and configuration model, the validation engine,
//! the form renderer, and the submission pipeline.

pub mod configuration;
pub mod error;
pub mod field;
pub mod renderer;
mod schema_check;
pub mod submission;
pub mod validation;
pub mod value;

pub use configuration::{ConfigId, ConfigKey, ConfigType, Configuration, ConfigurationPatch};
pub use error::{EngineError, Malformed, ValidationFailure};
pub use field::{
    CheckboxField, DisplayField, Field, FieldId, FieldKind, FieldSpec, FieldValidation,
    SelectField, TextField,
};
pub use renderer::{FormRenderer, RenderedField};
pub use submission::{try_submit, SubmitRequest, Submission};
pub use validation::{validate, Violation, ViolationKind};
pub use value::{FieldValue, Snapshot};
