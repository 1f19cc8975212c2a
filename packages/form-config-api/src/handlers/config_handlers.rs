//! Configuration CRUD endpoints.

use hyper::{body::Bytes, Response};

use form_engine_core::{ConfigKey, Configuration, ConfigurationPatch};

use super::request_utils::{
    json_response, key_from_params, map_engine_error_to_router_error,
    map_store_error_to_router_error, parse_json_body, parse_list_query, MatchitParams,
};
use super::response::Ack;
use crate::router::{AppState, RouteRequest, RouterError};

/// Creates a configuration.
///
/// # Endpoint
/// `POST /config/`
///
/// # Request Body
/// A configuration without `_id`; any id supplied is replaced.
///
/// # Response
/// - **201 Created**: The stored configuration including its new `_id`
///
/// # Errors
/// - **400 Bad Request**: Invalid JSON or malformed configuration
/// - **409 Conflict**: A configuration already exists for the tenant and type
pub fn create_config(
    req: &RouteRequest<'_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let draft: Configuration = parse_json_body(&req.body)?;
    draft.check().map_err(map_engine_error_to_router_error)?;

    let seen = state.cache.generation(&draft.key());
    let created = state
        .store
        .create(draft)
        .map_err(map_store_error_to_router_error)?;
    state.cache.fill(&created, seen);
    tracing::info!(key = %created.key(), "Config created");

    json_response(201, &created)
}

/// Fetches a configuration, served from cache when fresh.
///
/// # Endpoint
/// `GET /config/{tenant_id}/{config_type}`
///
/// # Errors
/// - **400 Bad Request**: Unknown config type
/// - **404 Not Found**: No configuration for the key
pub fn get_config(
    params: &MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let key = key_from_params(params)?;
    json_response(200, &load_configuration(state, &key)?)
}

/// Reads a configuration through the cache, filling it on a miss.
pub(crate) fn load_configuration(
    state: &AppState,
    key: &ConfigKey,
) -> Result<Configuration, RouterError> {
    if let Some(cached) = state.cache.get(key) {
        return Ok(cached);
    }

    let seen = state.cache.generation(key);
    let configuration = state
        .store
        .get(key)
        .map_err(map_store_error_to_router_error)?;
    state.cache.fill(&configuration, seen);
    Ok(configuration)
}

/// Replaces description and fields of a configuration.
///
/// # Endpoint
/// `PUT /config/{tenant_id}/{config_type}`
///
/// # Request Body
/// `{"description": ..., "fields": [...]}`, a full replacement.
///
/// # Errors
/// - **400 Bad Request**: Invalid JSON or malformed fields
/// - **404 Not Found**: No configuration for the key
pub fn update_config(
    req: &RouteRequest<'_>,
    params: &MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let key = key_from_params(params)?;
    let patch: ConfigurationPatch = parse_json_body(&req.body)?;
    patch.check().map_err(map_engine_error_to_router_error)?;

    let seen = state.cache.generation(&key);
    let updated = state
        .store
        .update(&key, patch)
        .map_err(map_store_error_to_router_error)?;
    state.cache.fill(&updated, seen);
    tracing::info!(key = %key, fields = updated.fields.len(), "Config updated");

    json_response(200, &updated)
}

/// Deletes a configuration.
///
/// # Endpoint
/// `DELETE /config/{tenant_id}/{config_type}`
///
/// # Response
/// - **200 OK**: `{"status": "success", "message": ...}`
///
/// # Errors
/// - **404 Not Found**: No configuration for the key
pub fn delete_config(
    params: &MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let key = key_from_params(params)?;
    let deleted = state.store.delete(&key);
    state.cache.invalidate(&key);
    deleted.map_err(map_store_error_to_router_error)?;
    tracing::info!(key = %key, "Config deleted");

    json_response(
        200,
        &Ack::success(format!(
            "Config for {}/{} deleted",
            key.tenant_id, key.config_type
        )),
    )
}

/// Lists configurations in creation order.
///
/// # Endpoint
/// `GET /config/?tenant_id=...&type=...`
///
/// Both filters are optional and combine conjunctively.
pub fn list_configs(
    req: &RouteRequest<'_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let filter = parse_list_query(req.query)?;
    let configurations = state
        .store
        .list(&filter)
        .map_err(map_store_error_to_router_error)?;
    json_response(200, &configurations)
}

/// Drops every cached configuration.
///
/// # Endpoint
/// `POST /config/flush-cache`
pub fn flush_cache(state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let flushed = state.cache.flush();
    tracing::info!(entries = flushed, "Config cache flushed");
    json_response(200, &Ack::success("Cache flushed"))
}
