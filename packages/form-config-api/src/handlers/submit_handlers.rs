//! Form submission endpoint.

use hyper::{body::Bytes, Response};

use form_engine_core::{try_submit, SubmitRequest};

use super::config_handlers::load_configuration;
use super::request_utils::{json_response, key_from_params, parse_json_body, MatchitParams};
use super::response::{violations_response, SubmitResponse};
use crate::router::{AppState, RouteRequest, RouterError};

/// Validates submitted values against the stored configuration.
///
/// # Endpoint
/// `POST /{tenant_id}/{config_type}/submit`
///
/// # Request Body
/// `{"values": {"<field name>": <string | bool>, ...}}`
///
/// # Response
/// - **200 OK**: `{"success": true, "data": {...}}` with configured fields only
///
/// # Errors
/// - **400 Bad Request**: Invalid JSON or unknown config type
/// - **404 Not Found**: No configuration for the key
/// - **422 Unprocessable Entity**: `{"detail": ..., "violations": [...]}`
pub fn submit_form(
    req: &RouteRequest<'_>,
    params: &MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let key = key_from_params(params)?;
    let request: SubmitRequest = parse_json_body(&req.body)?;

    let configuration = load_configuration(state, &key)?;

    match try_submit(&configuration, &request.values) {
        Ok(submission) => {
            tracing::info!(key = %key, values = submission.values.len(), "Form submitted");
            json_response(
                200,
                &SubmitResponse {
                    success: true,
                    data: submission.values,
                },
            )
        }
        Err(failure) => json_response(
            422,
            &violations_response(failure.to_string(), failure.violations),
        ),
    }
}
