//! Submission pipeline: validate every field, then emit a submission.

use serde::{Deserialize, Serialize};

use crate::configuration::{ConfigKey, ConfigType, Configuration};
use crate::error::ValidationFailure;
use crate::validation::{validate, Violation};
use crate::value::Snapshot;

/// Validated values ready for delivery to the submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub tenant_id: String,
    #[serde(rename = "type")]
    pub config_type: ConfigType,
    pub values: Snapshot,
}

impl Submission {
    pub fn key(&self) -> ConfigKey {
        ConfigKey::new(self.tenant_id.clone(), self.config_type)
    }

    /// Body posted to `/{tenant_id}/{type}/submit`.
    pub fn request(&self) -> SubmitRequest {
        SubmitRequest {
            values: self.values.clone(),
        }
    }
}

/// Wire body of a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub values: Snapshot,
}

/// Runs validation over every input field and builds a submission.
///
/// Fails closed: any violation rejects the whole submission, and all of them
/// are returned. The submission carries only the values of configured input
/// fields; unknown keys in the snapshot are dropped, and so are values whose
/// shape the field does not hold, exactly as if they were absent.
///
/// # Arguments
/// * `configuration` - Form description
/// * `snapshot` - Candidate values keyed by field name
///
/// # Returns
/// `Result<Submission, ValidationFailure>`
pub fn try_submit(
    configuration: &Configuration,
    snapshot: &Snapshot,
) -> Result<Submission, ValidationFailure> {
    let violations: Vec<Violation> = configuration
        .input_fields()
        .flat_map(|field| {
            let value = field.name().and_then(|name| snapshot.get(name));
            validate(field, value)
        })
        .collect();

    if !violations.is_empty() {
        tracing::debug!(
            key = %configuration.key(),
            violations = violations.len(),
            "Submission rejected"
        );
        return Err(ValidationFailure::new(violations));
    }

    let values = configuration
        .input_fields()
        .filter_map(|field| {
            let name = field.name()?;
            let value = snapshot.get(name)?;
            if !field.accepts(value) {
                tracing::debug!(field = %field.id, "Dropping value of the wrong shape");
                return None;
            }
            Some((name.to_string(), value.clone()))
        })
        .collect();

    Ok(Submission {
        tenant_id: configuration.tenant_id.clone(),
        config_type: configuration.config_type,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FieldValidation};
    use crate::validation::ViolationKind;
    use crate::value::FieldValue;

    #[test]
    fn test_unknown_keys_dropped() {
        let config = Configuration::draft("t1", ConfigType::PatientSearch)
            .with_field(Field::header("h", "Search"))
            .with_field(Field::text("f1", "Query", "query", None));
        let snapshot: Snapshot = [
            ("query".to_string(), FieldValue::from("smith")),
            ("extra".to_string(), FieldValue::from(true)),
        ]
        .into_iter()
        .collect();

        let submission = try_submit(&config, &snapshot).unwrap();
        assert_eq!(submission.values.len(), 1);
        assert_eq!(submission.values["query"], FieldValue::from("smith"));
        assert_eq!(submission.key().to_string(), "t1/patient-search");
    }

    #[test]
    fn test_every_violation_returned() {
        let config = Configuration::draft("t1", ConfigType::PatientRegistration)
            .with_field(Field::text("f1", "A", "a", Some(FieldValidation::required())))
            .with_field(Field::checkbox("f2", "B", "b", Some(FieldValidation::required())));

        let failure = try_submit(&config, &Snapshot::new()).unwrap_err();
        assert_eq!(failure.violations.len(), 2);
        assert!(failure
            .violations
            .iter()
            .all(|v| v.kind == ViolationKind::MissingRequired));
        assert_eq!(failure.for_field(&"f2".into()).count(), 1);
    }

    #[test]
    fn test_wrong_shape_values_never_submitted() {
        let config = Configuration::draft("t1", ConfigType::PatientSearch)
            .with_field(Field::text(
                "f1",
                "Query",
                "query",
                Some(FieldValidation::optional()),
            ))
            .with_field(Field::checkbox("f2", "Flag", "flag", None));
        let snapshot: Snapshot = [
            ("query".to_string(), FieldValue::from(true)),
            ("flag".to_string(), FieldValue::from("yes")),
        ]
        .into_iter()
        .collect();

        let submission = try_submit(&config, &snapshot).unwrap();
        assert!(submission.values.is_empty());

        let required = Configuration::draft("t1", ConfigType::PatientSearch).with_field(
            Field::text("f1", "Query", "query", Some(FieldValidation::required())),
        );
        let failure = try_submit(&required, &snapshot).unwrap_err();
        assert_eq!(failure.violations.len(), 1);
        assert_eq!(failure.violations[0].kind, ViolationKind::MissingRequired);
    }

    #[test]
    fn test_request_body_shape() {
        let submission = Submission {
            tenant_id: "t1".to_string(),
            config_type: ConfigType::PatientBilling,
            values: [("paid".to_string(), FieldValue::from(true))]
                .into_iter()
                .collect(),
        };
        let body = serde_json::to_value(submission.request()).unwrap();
        assert_eq!(body, serde_json::json!({"values": {"paid": true}}));
    }
}
