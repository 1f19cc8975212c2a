//! Request utilities for HTTP endpoints.

use http_body_util::BodyExt;
use hyper::{body::Bytes, Response};
use percent_encoding::percent_decode_str;
use serde::{de::DeserializeOwned, Serialize};
use tokio::time;

use form_engine_core::{ConfigKey, ConfigType, EngineError};

use crate::router::RouterError;
use crate::store::{ListFilter, StoreError};

/// Type alias for matchit parameters with explicit lifetimes
pub type MatchitParams<'a, 'b> = matchit::Params<'a, 'b>;

/// Helper function to read request body with timeout
pub async fn read_request_body_with_timeout(
    body: hyper::body::Incoming,
    timeout_ms: u64,
) -> Result<Bytes, RouterError> {
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, body.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok(body.to_bytes())
}

/// Map StoreError to appropriate RouterError
pub fn map_store_error_to_router_error(e: StoreError) -> RouterError {
    match e {
        StoreError::NotFound { .. } => RouterError::NotFound(e.to_string()),
        StoreError::Conflict { .. } => RouterError::Conflict(e.to_string()),
        StoreError::LockPoisoned => RouterError::InternalError(e.to_string()),
    }
}

/// Map a rejected configuration to a 400
pub fn map_engine_error_to_router_error(e: EngineError) -> RouterError {
    RouterError::BadRequest(e.to_string())
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Serializes a body and builds the response
pub fn json_response<T: Serialize>(status: u16, body: &T) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(body)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}

/// Parses a JSON request body.
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RouterError> {
    serde_json::from_slice(body)
        .map_err(|e| RouterError::BadRequest(format!("Invalid JSON body: {}", e)))
}

fn parse_config_type(raw: &str) -> Result<ConfigType, RouterError> {
    raw.parse()
        .map_err(|_| RouterError::BadRequest(format!("Unknown config type '{}'", raw)))
}

/// Extracts the `{tenant_id}/{config_type}` key from route parameters.
pub fn key_from_params(params: &MatchitParams<'_, '_>) -> Result<ConfigKey, RouterError> {
    let tenant_id = params
        .get("tenant_id")
        .map(|t| percent_decode_str(t).decode_utf8_lossy().into_owned())
        .ok_or_else(|| RouterError::BadRequest("Missing tenant id".to_string()))?;
    let raw_type = params
        .get("config_type")
        .ok_or_else(|| RouterError::BadRequest("Missing config type".to_string()))?;
    let config_type = parse_config_type(&percent_decode_str(raw_type).decode_utf8_lossy())?;
    Ok(ConfigKey::new(tenant_id, config_type))
}

/// Parse the list filter from a URL query string.
///
/// Recognizes `tenant_id` and `type`; other keys are ignored.
pub fn parse_list_query(query_str: Option<&str>) -> Result<ListFilter, RouterError> {
    let mut filter = ListFilter::default();

    if let Some(query_str) = query_str {
        for pair in query_str.split('&') {
            let Some((key, encoded_value)) = pair.split_once('=') else {
                continue;
            };
            let decoded_value = percent_decode_str(&encoded_value.replace('+', " "))
                .decode_utf8_lossy()
                .into_owned();

            match key {
                "tenant_id" => filter.tenant_id = Some(decoded_value),
                "type" => filter.config_type = Some(parse_config_type(&decoded_value)?),
                _ => {}
            }
        }
    }

    Ok(filter)
}
