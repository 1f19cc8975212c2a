//! Live editable state for a configuration.
//!
//! A [`FormRenderer`] holds one binding per input field, initialized from the
//! field's default. Rendering is a pure function of the configuration and the
//! current bindings; the renderer knows nothing about transport.

use crate::configuration::Configuration;
use crate::error::{EngineError, ValidationFailure};
use crate::field::{FieldId, FieldSpec};
use crate::submission::{self, Submission};
use crate::value::{FieldValue, Snapshot};

/// Current value of one input field.
#[derive(Debug, Clone)]
struct Binding {
    field_id: FieldId,
    name: String,
    initial: FieldValue,
    value: FieldValue,
}

impl Binding {
    fn new(field_id: FieldId, name: &str, initial: FieldValue) -> Self {
        Self {
            field_id,
            name: name.to_string(),
            value: initial.clone(),
            initial,
        }
    }
}

/// View of one field ready for presentation, in render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedField<'a> {
    Header {
        id: &'a FieldId,
        content: &'a str,
    },
    Static {
        id: &'a FieldId,
        content: &'a str,
    },
    Text {
        id: &'a FieldId,
        label: &'a str,
        name: &'a str,
        value: &'a str,
    },
    Select {
        id: &'a FieldId,
        label: &'a str,
        name: &'a str,
        options: &'a [String],
        selected: &'a str,
    },
    Checkbox {
        id: &'a FieldId,
        label: &'a str,
        name: &'a str,
        checked: bool,
    },
}

/// Editable form state materialized from a configuration.
#[derive(Debug, Clone)]
pub struct FormRenderer {
    configuration: Configuration,
    bindings: Vec<Binding>,
}

impl FormRenderer {
    /// Materializes a configuration into editable state.
    ///
    /// # Arguments
    /// * `configuration` - Configuration to render; it must pass the structural check
    ///
    /// # Returns
    /// `Result<FormRenderer, EngineError>` with `ConfigurationMalformed` for a broken configuration.
    pub fn new(configuration: Configuration) -> Result<Self, EngineError> {
        configuration.check()?;

        let bindings = configuration
            .fields
            .iter()
            .filter_map(|field| match &field.spec {
                FieldSpec::Header(_) | FieldSpec::Static(_) => None,
                FieldSpec::Text(text) => Some(Binding::new(
                    field.id.clone(),
                    &text.name,
                    FieldValue::Text(text.default.clone().unwrap_or_default()),
                )),
                FieldSpec::Select(select) => {
                    let initial = select
                        .default
                        .as_ref()
                        .filter(|d| select.options.contains(d))
                        .cloned()
                        .unwrap_or_default();
                    Some(Binding::new(
                        field.id.clone(),
                        &select.name,
                        FieldValue::Text(initial),
                    ))
                }
                FieldSpec::Checkbox(checkbox) => Some(Binding::new(
                    field.id.clone(),
                    &checkbox.name,
                    FieldValue::Bool(checkbox.default.unwrap_or(false)),
                )),
            })
            .collect();

        tracing::debug!(
            key = %configuration.key(),
            fields = configuration.fields.len(),
            "Materialized form"
        );

        Ok(Self {
            configuration,
            bindings,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    fn binding(&self, field_id: &FieldId) -> Option<&Binding> {
        self.bindings.iter().find(|b| &b.field_id == field_id)
    }

    /// Returns the current value of an input field.
    pub fn value(&self, field_id: &FieldId) -> Option<&FieldValue> {
        self.binding(field_id).map(|b| &b.value)
    }

    /// Sets the value of an input field.
    ///
    /// A select value outside the field's options is ignored and the previous
    /// valid value is kept.
    ///
    /// # Arguments
    /// * `field_id` - Field to update
    /// * `value` - New value; text for text/select fields, a flag for checkboxes
    ///
    /// # Returns
    /// `Result<&FieldValue, EngineError>` holding the value now bound to the field.
    pub fn set_value(
        &mut self,
        field_id: &FieldId,
        value: FieldValue,
    ) -> Result<&FieldValue, EngineError> {
        let field = self
            .configuration
            .field(field_id)
            .ok_or_else(|| EngineError::UnknownField(field_id.clone()))?;

        let accepted = match (&field.spec, value) {
            (FieldSpec::Header(_) | FieldSpec::Static(_), _) => {
                return Err(EngineError::NotAnInputField(field_id.clone()));
            }
            (FieldSpec::Text(_), FieldValue::Text(text)) => Some(FieldValue::Text(text)),
            (FieldSpec::Select(select), FieldValue::Text(text)) => {
                if select.options.contains(&text) {
                    Some(FieldValue::Text(text))
                } else {
                    tracing::debug!(
                        field = %field_id,
                        value = %text,
                        "Ignoring value outside select options"
                    );
                    None
                }
            }
            (FieldSpec::Checkbox(_), FieldValue::Bool(flag)) => Some(FieldValue::Bool(flag)),
            (FieldSpec::Text(_) | FieldSpec::Select(_), FieldValue::Bool(_)) => {
                return Err(EngineError::ValueShape {
                    field: field_id.clone(),
                    expected: "text",
                });
            }
            (FieldSpec::Checkbox(_), FieldValue::Text(_)) => {
                return Err(EngineError::ValueShape {
                    field: field_id.clone(),
                    expected: "boolean",
                });
            }
        };

        let binding = self
            .bindings
            .iter_mut()
            .find(|b| &b.field_id == field_id)
            .ok_or_else(|| EngineError::UnknownField(field_id.clone()))?;
        if let Some(value) = accepted {
            binding.value = value;
        }
        Ok(&binding.value)
    }

    /// Restores every binding to its initial value.
    pub fn reset(&mut self) {
        for binding in &mut self.bindings {
            binding.value = binding.initial.clone();
        }
    }

    /// Returns the current values keyed by field name.
    pub fn snapshot(&self) -> Snapshot {
        self.bindings
            .iter()
            .map(|b| (b.name.clone(), b.value.clone()))
            .collect()
    }

    /// Produces the presentation view of every field in render order.
    pub fn render(&self) -> Vec<RenderedField<'_>> {
        self.configuration
            .fields
            .iter()
            .map(|field| {
                let id = &field.id;
                let value = self.binding(id).map(|b| &b.value);
                let text = value.and_then(FieldValue::as_text).unwrap_or("");
                match &field.spec {
                    FieldSpec::Header(d) => RenderedField::Header {
                        id,
                        content: &d.content,
                    },
                    FieldSpec::Static(d) => RenderedField::Static {
                        id,
                        content: &d.content,
                    },
                    FieldSpec::Text(t) => RenderedField::Text {
                        id,
                        label: &t.label,
                        name: &t.name,
                        value: text,
                    },
                    FieldSpec::Select(s) => RenderedField::Select {
                        id,
                        label: &s.label,
                        name: &s.name,
                        options: &s.options,
                        selected: text,
                    },
                    FieldSpec::Checkbox(c) => RenderedField::Checkbox {
                        id,
                        label: &c.label,
                        name: &c.name,
                        checked: value.and_then(FieldValue::as_bool).unwrap_or(false),
                    },
                }
            })
            .collect()
    }

    /// Validates the current state and builds a submission.
    pub fn try_submit(&self) -> Result<Submission, ValidationFailure> {
        submission::try_submit(&self.configuration, &self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::ConfigType;
    use crate::field::{Field, FieldValidation};
    use ntest::timeout;

    fn config() -> Configuration {
        let mut select = Field::select("f2", "Sex", "sex", &["F", "M", "X"], None);
        if let FieldSpec::Select(s) = &mut select.spec {
            s.default = Some("M".to_string());
        }
        let mut text = Field::text("f1", "First name", "first_name", None);
        if let FieldSpec::Text(t) = &mut text.spec {
            t.default = Some("Ann".to_string());
        }
        Configuration::draft("t1", ConfigType::PatientRegistration)
            .with_field(Field::header("h", "Registration"))
            .with_field(text)
            .with_field(select)
            .with_field(Field::checkbox("f3", "Consent", "consent", None))
    }

    #[test]
    fn test_bindings_start_from_defaults() {
        let form = FormRenderer::new(config()).unwrap();
        let snapshot = form.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot["first_name"], FieldValue::from("Ann"));
        assert_eq!(snapshot["sex"], FieldValue::from("M"));
        assert_eq!(snapshot["consent"], FieldValue::from(false));
        assert!(form.value(&"h".into()).is_none());
    }

    #[test]
    fn test_select_rejects_value_outside_options() {
        let mut form = FormRenderer::new(config()).unwrap();
        let id = FieldId::from("f2");

        assert_eq!(form.set_value(&id, "F".into()).unwrap(), &FieldValue::from("F"));
        assert_eq!(form.set_value(&id, "Q".into()).unwrap(), &FieldValue::from("F"));
        assert_eq!(form.value(&id), Some(&FieldValue::from("F")));
    }

    #[test]
    fn test_set_value_errors() {
        let mut form = FormRenderer::new(config()).unwrap();
        assert_eq!(
            form.set_value(&"nope".into(), "x".into()),
            Err(EngineError::UnknownField("nope".into()))
        );
        assert_eq!(
            form.set_value(&"h".into(), "x".into()),
            Err(EngineError::NotAnInputField("h".into()))
        );
        assert!(matches!(
            form.set_value(&"f3".into(), "yes".into()),
            Err(EngineError::ValueShape { expected: "boolean", .. })
        ));
        assert!(matches!(
            form.set_value(&"f1".into(), true.into()),
            Err(EngineError::ValueShape { expected: "text", .. })
        ));
    }

    #[test]
    #[timeout(1000)]
    fn test_reset_restores_defaults() {
        let mut form = FormRenderer::new(config()).unwrap();
        form.set_value(&"f1".into(), "Bob".into()).unwrap();
        form.set_value(&"f3".into(), true.into()).unwrap();
        form.reset();
        assert_eq!(form.snapshot()["first_name"], FieldValue::from("Ann"));
        assert_eq!(form.snapshot()["consent"], FieldValue::from(false));
    }

    #[test]
    fn test_render_follows_bindings() {
        let mut form = FormRenderer::new(config()).unwrap();
        form.set_value(&"f3".into(), true.into()).unwrap();
        let rendered = form.render();

        assert_eq!(rendered.len(), 4);
        assert!(matches!(rendered[0], RenderedField::Header { content: "Registration", .. }));
        assert!(matches!(rendered[1], RenderedField::Text { value: "Ann", .. }));
        match &rendered[2] {
            RenderedField::Select { options, selected, .. } => {
                assert_eq!(options.len(), 3);
                assert_eq!(*selected, "M");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(rendered[3], RenderedField::Checkbox { checked: true, .. }));
    }

    #[test]
    fn test_malformed_configuration_not_rendered() {
        let config = Configuration::draft("t1", ConfigType::PatientSearch).with_field(Field::text(
            "f1",
            "A",
            "a",
            Some(FieldValidation::required().with_pattern("[")),
        ));
        assert!(matches!(
            FormRenderer::new(config),
            Err(EngineError::ConfigurationMalformed(_))
        ));
    }
}
