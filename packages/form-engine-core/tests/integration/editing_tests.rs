//! Operator editing workflow: build a draft, check it, render it.

use serde_json::json;

use form_engine_core::{
    ConfigType, Configuration, EngineError, Field, FieldKind, FieldSpec, FormRenderer, Malformed,
    RenderedField,
};

/// Payload as the configuration editor sends it, every key on every field
fn editor_payload() -> serde_json::Value {
    json!({
        "tenant_id": "tenant123",
        "type": "patient-registration",
        "description": "Front desk registration",
        "fields": [
            {"id": "h1", "type": "header", "label": "", "name": "", "options": [], "content": "Patient", "default": ""},
            {"id": "f1", "type": "text", "label": "First name", "name": "first_name", "options": [], "content": "", "default": "",
             "validation": {"required": true, "min_length": 2, "max_length": 40}},
            {"id": "f2", "type": "select", "label": "Sex", "name": "sex", "options": ["F", "M", "X"], "content": "", "default": "X"},
            {"id": "f3", "type": "checkbox", "label": "Consent", "name": "consent", "options": [], "content": "", "default": true}
        ]
    })
}

#[test]
fn test_editor_payload_renders() {
    let config: Configuration = serde_json::from_value(editor_payload()).unwrap();
    assert!(config.is_draft());
    assert_eq!(config.fields.len(), 4);
    config.check().unwrap();

    let form = FormRenderer::new(config).unwrap();
    let rendered = form.render();
    assert!(matches!(rendered[0], RenderedField::Header { content: "Patient", .. }));
    assert!(matches!(rendered[2], RenderedField::Select { selected: "X", .. }));
    assert!(matches!(rendered[3], RenderedField::Checkbox { checked: true, .. }));
}

#[test]
fn test_new_fields_must_be_completed_before_save() {
    let mut config = Configuration::draft("tenant123", ConfigType::PatientSearch);
    config.push_field(Field::new_for_editing(FieldKind::Text));
    let id = config.fields[0].id.clone();

    // Fresh input fields have no name yet
    assert!(matches!(
        config.check(),
        Err(EngineError::ConfigurationMalformed(Malformed::MissingName(_)))
    ));

    if let FieldSpec::Text(text) = &mut config.field_mut(&id).unwrap().spec {
        text.label = "Surname".to_string();
        text.name = "surname".to_string();
    }
    config.check().unwrap();

    // Switching to select keeps the name but needs options
    config.field_mut(&id).unwrap().change_kind(FieldKind::Select);
    assert!(matches!(
        config.check(),
        Err(EngineError::ConfigurationMalformed(Malformed::EmptyOptions(_)))
    ));
    assert_eq!(config.field(&id).unwrap().name(), Some("surname"));
}

#[test]
fn test_editor_payload_with_switched_kinds() {
    // Fields are created as text with `default: ""` and keep that key when
    // switched; a checkbox switched back to text keeps `default: false`
    let config: Configuration = serde_json::from_value(json!({
        "tenant_id": "tenant123",
        "type": "patient-details",
        "fields": [
            {"id": "f1", "type": "checkbox", "label": "Smoker", "name": "smoker", "options": [], "content": "", "default": "",
             "validation": {"required": false}},
            {"id": "f2", "type": "text", "label": "Notes", "name": "notes", "options": [], "content": "", "default": false,
             "validation": {"required": false}}
        ]
    }))
    .unwrap();
    config.check().unwrap();

    let form = FormRenderer::new(config).unwrap();
    let rendered = form.render();
    assert!(matches!(rendered[0], RenderedField::Checkbox { checked: false, .. }));
    assert!(matches!(rendered[1], RenderedField::Text { value: "", .. }));
}
