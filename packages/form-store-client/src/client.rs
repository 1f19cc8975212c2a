//! REST client for the configuration store.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use form_engine_core::{
    ConfigKey, ConfigType, Configuration, ConfigurationPatch, Snapshot, Submission,
    ValidationFailure, Violation,
};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::sequence::{Outcome, SequenceGuard};

/// Characters left unescaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Acknowledgement returned by delete and cache flush.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    pub message: String,
}

/// Error body sent by the backend.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "message")]
    detail: Option<String>,
    #[serde(default)]
    violations: Option<Vec<Violation>>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    data: Snapshot,
}

/// Thin facade over the store's REST surface.
///
/// Holds no cache of its own; a `get` right after a write is only as fresh
/// as the backend's cache, which [`StoreClient::flush_cache`] invalidates.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: Client,
    base_url: String,
}

impl StoreClient {
    /// Builds a client for the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.extend(utf8_percent_encode(segment, PATH_SEGMENT));
        }
        url
    }

    fn config_url(&self, key: &ConfigKey) -> String {
        self.url(&["config", &key.tenant_id, key.config_type.as_ref()])
    }

    /// Fetches the configuration for a tenant and type.
    pub async fn get(
        &self,
        tenant_id: &str,
        config_type: ConfigType,
    ) -> Result<Configuration, ClientError> {
        let key = ConfigKey::new(tenant_id, config_type);
        tracing::debug!(key = %key, "Fetching config");
        let response = self.http.get(self.config_url(&key)).send().await?;
        read_json(response, Some(&key)).await
    }

    /// Checks a draft locally, then stores it.
    ///
    /// # Errors
    ///
    /// [`ClientError::Malformed`] without contacting the backend when the draft
    /// fails its structural check; [`ClientError::Conflict`] when the key is taken.
    pub async fn create(&self, draft: &Configuration) -> Result<Configuration, ClientError> {
        draft.check()?;
        let key = draft.key();
        tracing::debug!(key = %key, "Creating config");
        let response = self
            .http
            .post(format!("{}/", self.url(&["config"])))
            .json(draft)
            .send()
            .await?;
        read_json(response, Some(&key)).await
    }

    /// Replaces description and fields of a stored configuration.
    ///
    /// The patch is a full replacement: resend every field.
    pub async fn update(
        &self,
        tenant_id: &str,
        config_type: ConfigType,
        patch: &ConfigurationPatch,
    ) -> Result<Configuration, ClientError> {
        patch.check()?;
        let key = ConfigKey::new(tenant_id, config_type);
        tracing::debug!(key = %key, fields = patch.fields.len(), "Updating config");
        let response = self
            .http
            .put(self.config_url(&key))
            .json(patch)
            .send()
            .await?;
        read_json(response, Some(&key)).await
    }

    /// Deletes a configuration. A second delete reports `NotFound`.
    pub async fn delete(&self, tenant_id: &str, config_type: ConfigType) -> Result<Ack, ClientError> {
        let key = ConfigKey::new(tenant_id, config_type);
        tracing::debug!(key = %key, "Deleting config");
        let response = self.http.delete(self.config_url(&key)).send().await?;
        read_json(response, Some(&key)).await
    }

    /// Lists configurations; both filters are optional and conjunctive.
    pub async fn list(
        &self,
        tenant_id: Option<&str>,
        config_type: Option<ConfigType>,
    ) -> Result<Vec<Configuration>, ClientError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(tenant_id) = tenant_id {
            query.push(("tenant_id", tenant_id));
        }
        if let Some(config_type) = &config_type {
            query.push(("type", config_type.as_ref()));
        }
        let response = self
            .http
            .get(format!("{}/", self.url(&["config"])))
            .query(&query)
            .send()
            .await?;
        read_json(response, None).await
    }

    /// Asks the backend to drop its configuration cache.
    pub async fn flush_cache(&self) -> Result<Ack, ClientError> {
        let response = self
            .http
            .post(self.url(&["config", "flush-cache"]))
            .send()
            .await?;
        let ack: Ack = read_json(response, None).await?;
        tracing::info!("Backend config cache flushed");
        Ok(ack)
    }

    /// Delivers a validated submission.
    ///
    /// # Returns
    /// The values the backend accepted.
    ///
    /// # Errors
    ///
    /// [`ClientError::Validation`] when the backend rejects the values with
    /// violations, [`ClientError::NotFound`] when the form no longer exists.
    pub async fn submit(&self, submission: &Submission) -> Result<Snapshot, ClientError> {
        let key = submission.key();
        let url = self.url(&[&key.tenant_id, key.config_type.as_ref(), "submit"]);
        let response = self
            .http
            .post(url)
            .json(&submission.request())
            .send()
            .await?;
        let accepted: SubmitResponse = read_json(response, Some(&key)).await?;
        Ok(accepted.data)
    }

    /// Fetches a configuration through the sequence guard.
    ///
    /// Resolves to [`Outcome::Stale`] when another request for the same slot
    /// was issued while this one was in flight, whatever this one returned.
    pub async fn get_latest(
        &self,
        guard: &SequenceGuard,
        tenant_id: &str,
        config_type: ConfigType,
    ) -> Result<Outcome<Configuration>, ClientError> {
        let ticket = guard.issue(ConfigKey::new(tenant_id, config_type));
        let result = self.get(tenant_id, config_type).await;
        match guard.complete(&ticket, ()) {
            Outcome::Fresh(()) => result.map(Outcome::Fresh),
            Outcome::Stale => Ok(Outcome::Stale),
        }
    }
}

/// Decodes a success body or maps the failure status onto [`ClientError`].
async fn read_json<T: DeserializeOwned>(
    response: Response,
    key: Option<&ConfigKey>,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(|e| {
            ClientError::transport(format!("invalid response body: {}", e))
        });
    }

    let body = response.bytes().await?;
    let error: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
    let detail = error
        .detail
        .unwrap_or_else(|| String::from_utf8_lossy(&body).trim().to_string());
    tracing::warn!(status = status.as_u16(), "Store request failed: {}", detail);

    match (status, key) {
        (StatusCode::NOT_FOUND, Some(key)) => Err(ClientError::NotFound { key: key.clone() }),
        (StatusCode::CONFLICT, Some(key)) => Err(ClientError::Conflict {
            key: key.clone(),
            detail,
        }),
        (StatusCode::UNPROCESSABLE_ENTITY, _) if error.violations.is_some() => Err(
            ClientError::Validation(ValidationFailure::new(error.violations.unwrap_or_default())),
        ),
        _ => Err(ClientError::Transport {
            status: Some(status.as_u16()),
            detail,
        }),
    }
}
