//! Tenant-scoped form configurations.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::error::EngineError;
use crate::field::{Field, FieldId};
use crate::schema_check;

/// Known configuration kinds, one form per kind and tenant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ConfigType {
    PatientRegistration,
    PatientSearch,
    PatientDetails,
    PatientEncounters,
    PatientBilling,
}

/// Store-assigned identifier of a saved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigId(String);

impl ConfigId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage identity of a configuration: at most one exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey {
    pub tenant_id: String,
    pub config_type: ConfigType,
}

impl ConfigKey {
    pub fn new(tenant_id: impl Into<String>, config_type: ConfigType) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            config_type,
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant_id, self.config_type)
    }
}

/// Declarative description of one form.
///
/// `fields` order is render order and carries no other meaning. `id` is absent
/// on drafts and assigned by the store on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ConfigId>,
    pub tenant_id: String,
    #[serde(rename = "type")]
    pub config_type: ConfigType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Configuration {
    /// Creates an empty draft with no id.
    pub fn draft(tenant_id: impl Into<String>, config_type: ConfigType) -> Self {
        Self {
            id: None,
            tenant_id: tenant_id.into(),
            config_type,
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn key(&self) -> ConfigKey {
        ConfigKey::new(self.tenant_id.clone(), self.config_type)
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// Appends a field at the end of the render order.
    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Removes a field by id, returning it if present.
    pub fn remove_field(&mut self, id: &FieldId) -> Option<Field> {
        let index = self.fields.iter().position(|f| &f.id == id)?;
        Some(self.fields.remove(index))
    }

    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }

    pub fn field_mut(&mut self, id: &FieldId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| &f.id == id)
    }

    /// Iterates fields that hold a value, in render order.
    pub fn input_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_display())
    }

    /// Checks every structural invariant required before save or render.
    ///
    /// # Returns
    /// `Result<(), EngineError>` with `ConfigurationMalformed` on the first problem found.
    pub fn check(&self) -> Result<(), EngineError> {
        schema_check::check_tenant(&self.tenant_id)?;
        schema_check::check_fields(&self.fields)?;
        Ok(())
    }

    /// Replaces description and fields wholesale; identity is untouched.
    pub fn apply(&mut self, patch: ConfigurationPatch) {
        self.description = patch.description;
        self.fields = patch.fields;
    }
}

/// Body of an update: a full replacement of `description` and `fields`.
///
/// Not a deep merge, callers resend the complete field list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationPatch {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl ConfigurationPatch {
    pub fn check(&self) -> Result<(), EngineError> {
        schema_check::check_fields(&self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldValidation;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn test_config_type_wire_names() {
        let names: Vec<String> = ConfigType::iter().map(|t| t.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "patient-registration",
                "patient-search",
                "patient-details",
                "patient-encounters",
                "patient-billing"
            ]
        );
        assert_eq!(
            "patient-search".parse::<ConfigType>().unwrap(),
            ConfigType::PatientSearch
        );
        assert!("invoices".parse::<ConfigType>().is_err());
        assert_eq!(
            serde_json::to_value(ConfigType::PatientBilling).unwrap(),
            json!("patient-billing")
        );
    }

    #[test]
    fn test_draft_serializes_without_id() {
        let draft = Configuration::draft("t1", ConfigType::PatientRegistration).with_field(
            Field::text("f1", "First name", "first_name", Some(FieldValidation::required())),
        );
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("_id").is_none());
        assert_eq!(value["tenant_id"], "t1");
        assert_eq!(value["type"], "patient-registration");
        assert_eq!(value["fields"][0]["name"], "first_name");

        let back: Configuration = serde_json::from_value(value).unwrap();
        assert_eq!(back, draft);
    }

    #[test]
    fn test_field_editing_operations() {
        let mut config = Configuration::draft("t1", ConfigType::PatientDetails);
        config.push_field(Field::header("h", "Details"));
        config.push_field(Field::text("a", "A", "a", None));
        config.push_field(Field::checkbox("b", "B", "b", None));

        assert_eq!(config.input_fields().count(), 2);
        config.field_mut(&FieldId::from("a")).unwrap().change_kind(crate::FieldKind::Select);
        assert_eq!(config.field(&"a".into()).unwrap().kind(), crate::FieldKind::Select);

        let removed = config.remove_field(&FieldId::from("h")).unwrap();
        assert_eq!(removed.id.as_str(), "h");
        assert!(config.remove_field(&FieldId::from("h")).is_none());
        let order: Vec<&str> = config.fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_apply_replaces_fields_wholesale() {
        let mut config = Configuration::draft("t1", ConfigType::PatientSearch)
            .with_description("old")
            .with_field(Field::text("a", "A", "a", None))
            .with_field(Field::text("b", "B", "b", None));
        config.id = Some(ConfigId::new("abc"));

        config.apply(ConfigurationPatch {
            description: None,
            fields: vec![Field::text("c", "C", "c", None)],
        });

        assert_eq!(config.id, Some(ConfigId::new("abc")));
        assert_eq!(config.description, None);
        assert_eq!(config.fields.len(), 1);
        assert_eq!(config.fields[0].id.as_str(), "c");
    }
}
