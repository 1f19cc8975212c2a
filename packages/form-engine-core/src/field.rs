//! Field definitions within a form configuration.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::value::FieldValue;

/// Identity of a field, unique within its configuration and stable across edits.
///
/// This is an engine-internal key (reconciliation and violation reporting).
/// The key written into a submission is the field's `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh globally unique id (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Optional constraint set attached to an input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidation {
    /// Whether a value must be supplied (checkboxes: must be checked)
    #[serde(default = "default_required")]
    pub required: bool,
    /// Minimum length in characters of the trimmed value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum length in characters of the trimmed value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression the whole value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

fn default_required() -> bool {
    true
}

impl Default for FieldValidation {
    fn default() -> Self {
        Self::required()
    }
}

impl FieldValidation {
    pub fn required() -> Self {
        Self {
            required: true,
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    pub fn optional() -> Self {
        Self {
            required: false,
            ..Self::required()
        }
    }

    pub fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// Closed set of field kinds, as written in the `type` tag on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Header,
    Static,
    Text,
    Select,
    Checkbox,
}

impl FieldKind {
    /// Display kinds are rendered but never validated or submitted.
    pub fn is_display(self) -> bool {
        matches!(self, FieldKind::Header | FieldKind::Static)
    }
}

/// Content of a `header` or `static` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayField {
    #[serde(default)]
    pub content: String,
}

/// Free text input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextField {
    #[serde(default)]
    pub label: String,
    /// Submission key
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::text_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

/// Choice among an ordered list of options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectField {
    #[serde(default)]
    pub label: String,
    /// Submission key
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Initially selected option; an empty string means no selection
    #[serde(
        default,
        deserialize_with = "lenient::text_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

/// Boolean toggle. Only `validation.required` is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxField {
    #[serde(default)]
    pub label: String,
    /// Submission key
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::checkbox_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

/// Field defaults as the editor sends them.
///
/// The editor keeps the `default` key when a field switches kind, so a
/// checkbox may arrive with `""` and a text field with `false`. A default of
/// the other shape reads as no default.
mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDefault {
        Flag(bool),
        Text(String),
    }

    pub(super) fn text_default<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<RawDefault>::deserialize(deserializer)? {
            Some(RawDefault::Text(text)) => Some(text),
            Some(RawDefault::Flag(_)) | None => None,
        })
    }

    pub(super) fn checkbox_default<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<RawDefault>::deserialize(deserializer)? {
            Some(RawDefault::Flag(flag)) => Some(flag),
            Some(RawDefault::Text(text)) => text.trim().parse().ok(),
            None => None,
        })
    }
}

/// Variant-specific part of a field, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldSpec {
    Header(DisplayField),
    Static(DisplayField),
    Text(TextField),
    Select(SelectField),
    Checkbox(CheckboxField),
}

impl FieldSpec {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldSpec::Header(_) => FieldKind::Header,
            FieldSpec::Static(_) => FieldKind::Static,
            FieldSpec::Text(_) => FieldKind::Text,
            FieldSpec::Select(_) => FieldKind::Select,
            FieldSpec::Checkbox(_) => FieldKind::Checkbox,
        }
    }

    /// Builds the safe editing defaults for a kind.
    ///
    /// Input kinds start with an empty label and name, an empty default
    /// (`false` for checkboxes) and `required: true`.
    pub fn editing_defaults(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Header => FieldSpec::Header(DisplayField::default()),
            FieldKind::Static => FieldSpec::Static(DisplayField::default()),
            FieldKind::Text => FieldSpec::Text(TextField {
                default: Some(String::new()),
                validation: Some(FieldValidation::required()),
                ..TextField::default()
            }),
            FieldKind::Select => FieldSpec::Select(SelectField {
                options: Vec::new(),
                default: Some(String::new()),
                validation: Some(FieldValidation::required()),
                ..SelectField::default()
            }),
            FieldKind::Checkbox => FieldSpec::Checkbox(CheckboxField {
                default: Some(false),
                validation: Some(FieldValidation::required()),
                ..CheckboxField::default()
            }),
        }
    }
}

/// One rendering and validation unit of a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    #[serde(flatten)]
    pub spec: FieldSpec,
}

impl Field {
    pub fn new(id: impl Into<FieldId>, spec: FieldSpec) -> Self {
        Self {
            id: id.into(),
            spec,
        }
    }

    /// Creates a field for the editor with a fresh id and safe defaults.
    pub fn new_for_editing(kind: FieldKind) -> Self {
        Self {
            id: FieldId::generate(),
            spec: FieldSpec::editing_defaults(kind),
        }
    }

    pub fn header(id: impl Into<FieldId>, content: impl Into<String>) -> Self {
        Self::new(
            id,
            FieldSpec::Header(DisplayField {
                content: content.into(),
            }),
        )
    }

    pub fn static_text(id: impl Into<FieldId>, content: impl Into<String>) -> Self {
        Self::new(
            id,
            FieldSpec::Static(DisplayField {
                content: content.into(),
            }),
        )
    }

    pub fn text(
        id: impl Into<FieldId>,
        label: impl Into<String>,
        name: impl Into<String>,
        validation: Option<FieldValidation>,
    ) -> Self {
        Self::new(
            id,
            FieldSpec::Text(TextField {
                label: label.into(),
                name: name.into(),
                default: None,
                validation,
            }),
        )
    }

    pub fn select(
        id: impl Into<FieldId>,
        label: impl Into<String>,
        name: impl Into<String>,
        options: &[&str],
        validation: Option<FieldValidation>,
    ) -> Self {
        Self::new(
            id,
            FieldSpec::Select(SelectField {
                label: label.into(),
                name: name.into(),
                options: options.iter().map(|o| o.to_string()).collect(),
                default: None,
                validation,
            }),
        )
    }

    pub fn checkbox(
        id: impl Into<FieldId>,
        label: impl Into<String>,
        name: impl Into<String>,
        validation: Option<FieldValidation>,
    ) -> Self {
        Self::new(
            id,
            FieldSpec::Checkbox(CheckboxField {
                label: label.into(),
                name: name.into(),
                default: None,
                validation,
            }),
        )
    }

    pub fn kind(&self) -> FieldKind {
        self.spec.kind()
    }

    pub fn is_display(&self) -> bool {
        self.kind().is_display()
    }

    /// Submission key of an input field; `None` for display fields.
    pub fn name(&self) -> Option<&str> {
        match &self.spec {
            FieldSpec::Header(_) | FieldSpec::Static(_) => None,
            FieldSpec::Text(f) => Some(&f.name),
            FieldSpec::Select(f) => Some(&f.name),
            FieldSpec::Checkbox(f) => Some(&f.name),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match &self.spec {
            FieldSpec::Header(_) | FieldSpec::Static(_) => None,
            FieldSpec::Text(f) => Some(&f.label),
            FieldSpec::Select(f) => Some(&f.label),
            FieldSpec::Checkbox(f) => Some(&f.label),
        }
    }

    /// Whether a value has the shape this field holds: text for text and
    /// select fields, a flag for checkboxes. Display fields hold nothing.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (&self.spec, value),
            (FieldSpec::Text(_) | FieldSpec::Select(_), FieldValue::Text(_))
                | (FieldSpec::Checkbox(_), FieldValue::Bool(_))
        )
    }

    pub fn validation(&self) -> Option<&FieldValidation> {
        match &self.spec {
            FieldSpec::Header(_) | FieldSpec::Static(_) => None,
            FieldSpec::Text(f) => f.validation.as_ref(),
            FieldSpec::Select(f) => f.validation.as_ref(),
            FieldSpec::Checkbox(f) => f.validation.as_ref(),
        }
    }

    /// Switches the field to another kind, keeping its id.
    ///
    /// Label and name carry across input kinds, content across display kinds.
    /// Everything else resets to the editing defaults of the new kind.
    pub fn change_kind(&mut self, kind: FieldKind) {
        if self.kind() == kind {
            return;
        }
        let label = self.label().map(str::to_string);
        let name = self.name().map(str::to_string);
        let content = match &self.spec {
            FieldSpec::Header(d) | FieldSpec::Static(d) => Some(d.content.clone()),
            _ => None,
        };

        let mut spec = FieldSpec::editing_defaults(kind);
        match &mut spec {
            FieldSpec::Header(d) | FieldSpec::Static(d) => {
                d.content = content.unwrap_or_default();
            }
            FieldSpec::Text(TextField {
                label: l, name: n, ..
            })
            | FieldSpec::Select(SelectField {
                label: l, name: n, ..
            })
            | FieldSpec::Checkbox(CheckboxField {
                label: l, name: n, ..
            }) => {
                *l = label.unwrap_or_default();
                *n = name.unwrap_or_default();
            }
        }
        self.spec = spec;
    }
}
