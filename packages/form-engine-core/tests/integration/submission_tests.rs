//! Validation and submission scenarios exercised through the public API.

use pretty_assertions::assert_eq;

use form_engine_core::{
    try_submit, validate, ConfigType, Configuration, Field, FieldValidation, FieldValue,
    FormRenderer, Snapshot, ViolationKind,
};

fn registration() -> Configuration {
    Configuration::draft("t1", ConfigType::PatientRegistration).with_field(Field::text(
        "f1",
        "First name",
        "first_name",
        Some(FieldValidation::required().with_min_length(2)),
    ))
}

fn snapshot(pairs: &[(&str, FieldValue)]) -> Snapshot {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Single-letter first name is rejected, two letters go through
#[test]
fn test_patient_registration_scenario() {
    let config = registration();

    let failure = try_submit(&config, &snapshot(&[("first_name", "A".into())])).unwrap_err();
    assert_eq!(failure.violations.len(), 1);
    assert_eq!(failure.violations[0].kind, ViolationKind::TooShort);
    assert_eq!(failure.violations[0].field_id.as_str(), "f1");
    assert_eq!(failure.violations[0].field_name, "first_name");

    let submission = try_submit(&config, &snapshot(&[("first_name", "Al".into())])).unwrap();
    assert_eq!(submission.tenant_id, "t1");
    assert_eq!(submission.config_type, ConfigType::PatientRegistration);
    assert_eq!(submission.values, snapshot(&[("first_name", "Al".into())]));
}

#[test]
fn test_length_window_for_text_and_select() {
    for (m, n) in [(1usize, 1usize), (2, 4), (3, 10)] {
        let rules = FieldValidation::required().with_min_length(m).with_max_length(n);
        let options: Vec<String> = (m - 1..=n + 1).map(|len| "x".repeat(len)).collect();
        let option_refs: Vec<&str> = options.iter().map(String::as_str).collect();

        let fields = [
            Field::text("t", "T", "t", Some(rules.clone())),
            Field::select("s", "S", "s", &option_refs, Some(rules.clone())),
        ];

        for field in &fields {
            let value = |len: usize| FieldValue::from("x".repeat(len));

            let short: Vec<_> = validate(field, Some(&value(m - 1)))
                .into_iter()
                .map(|v| v.kind)
                .filter(|k| *k != ViolationKind::MissingRequired)
                .collect();
            assert_eq!(short, vec![ViolationKind::TooShort], "m={} n={}", m, n);

            for len in m..=n {
                assert!(validate(field, Some(&value(len))).is_empty(), "len={}", len);
            }

            let long: Vec<_> = validate(field, Some(&value(n + 1)))
                .into_iter()
                .map(|v| v.kind)
                .collect();
            assert_eq!(long, vec![ViolationKind::TooLong]);
        }
    }
}

/// A required checkbox reads as "must be checked". Whether `required` should
/// instead mean "has an explicit value" is an open product question; these
/// assertions pin the literal rule.
#[test]
fn test_required_checkbox_policy() {
    let field = Field::checkbox("c", "Consent", "consent", Some(FieldValidation::required()));

    let unchecked = validate(&field, Some(&false.into()));
    assert_eq!(unchecked.len(), 1);
    assert_eq!(unchecked[0].kind, ViolationKind::MissingRequired);
    assert!(validate(&field, Some(&true.into())).is_empty());
}

#[test]
fn test_display_fields_ignore_any_input() {
    for field in [Field::header("h", "Title"), Field::static_text("s", "Body")] {
        assert!(validate(&field, None).is_empty());
        assert!(validate(&field, Some(&"".into())).is_empty());
        assert!(validate(&field, Some(&true.into())).is_empty());
    }
}

#[test]
fn test_renderer_feeds_pipeline() {
    let config = registration().with_field(Field::checkbox(
        "f2",
        "Consent",
        "consent",
        Some(FieldValidation::required()),
    ));
    let mut form = FormRenderer::new(config).unwrap();

    let failure = form.try_submit().unwrap_err();
    let kinds: Vec<_> = failure.violations.iter().map(|v| v.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ViolationKind::MissingRequired,
            ViolationKind::TooShort,
            ViolationKind::MissingRequired
        ]
    );

    form.set_value(&"f1".into(), "Alice".into()).unwrap();
    form.set_value(&"f2".into(), true.into()).unwrap();
    let submission = form.try_submit().unwrap();
    assert_eq!(
        submission.values,
        snapshot(&[("first_name", "Alice".into()), ("consent", true.into())])
    );
}
