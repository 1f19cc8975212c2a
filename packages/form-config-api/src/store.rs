//! In-memory configuration store keyed by tenant and configuration type.

use std::sync::RwLock;

use thiserror::Error;

use form_engine_core::{ConfigId, ConfigKey, ConfigType, Configuration, ConfigurationPatch};

/// Store operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No configuration stored under the key
    #[error("Config not found")]
    NotFound { key: ConfigKey },

    /// A configuration already exists under the key
    #[error("Config '{key}' already exists")]
    Conflict { key: ConfigKey },

    /// Lock poisoned (RwLock poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,
}

/// Conjunctive list filter; `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub tenant_id: Option<String>,
    pub config_type: Option<ConfigType>,
}

impl ListFilter {
    pub fn matches(&self, configuration: &Configuration) -> bool {
        self.tenant_id
            .as_deref()
            .map_or(true, |t| t == configuration.tenant_id)
            && self
                .config_type
                .map_or(true, |t| t == configuration.config_type)
    }
}

/// Holds every configuration in creation order.
#[derive(Debug, Default)]
pub struct ConfigStore {
    configurations: RwLock<Vec<Configuration>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the configuration stored under a key.
    pub fn get(&self, key: &ConfigKey) -> Result<Configuration, StoreError> {
        let configurations = self
            .configurations
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        configurations
            .iter()
            .find(|c| &c.key() == key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { key: key.clone() })
    }

    /// Persists a draft and assigns it a fresh id.
    ///
    /// # Arguments
    /// * `draft` - Configuration to store; any id it carries is replaced
    ///
    /// # Returns
    /// `Result<Configuration, StoreError>` containing the stored configuration,
    /// or `Conflict` when the key is taken. An existing entry is never touched.
    pub fn create(&self, mut draft: Configuration) -> Result<Configuration, StoreError> {
        let mut configurations = self
            .configurations
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let key = draft.key();
        if configurations.iter().any(|c| c.key() == key) {
            return Err(StoreError::Conflict { key });
        }
        draft.id = Some(ConfigId::generate());
        configurations.push(draft.clone());
        Ok(draft)
    }

    /// Replaces description and fields of an existing configuration.
    pub fn update(
        &self,
        key: &ConfigKey,
        patch: ConfigurationPatch,
    ) -> Result<Configuration, StoreError> {
        let mut configurations = self
            .configurations
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let existing = configurations
            .iter_mut()
            .find(|c| &c.key() == key)
            .ok_or_else(|| StoreError::NotFound { key: key.clone() })?;
        existing.apply(patch);
        Ok(existing.clone())
    }

    /// Removes a configuration.
    pub fn delete(&self, key: &ConfigKey) -> Result<Configuration, StoreError> {
        let mut configurations = self
            .configurations
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let index = configurations
            .iter()
            .position(|c| &c.key() == key)
            .ok_or_else(|| StoreError::NotFound { key: key.clone() })?;
        Ok(configurations.remove(index))
    }

    /// Lists matching configurations in creation order.
    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Configuration>, StoreError> {
        let configurations = self
            .configurations
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(configurations
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    pub fn len(&self) -> usize {
        self.configurations.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
