//! Matchit routing configuration.

use std::sync::Arc;

use hyper::{body::Bytes, Method, Request, Response};
use matchit::Router as MatchitRouter;

use crate::cache::ConfigCache;
use crate::config::ServerConfig;
use crate::handlers;
use crate::handlers::request_utils::read_request_body_with_timeout;
use crate::store::ConfigStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration store
    pub store: Arc<ConfigStore>,
    /// Read-through cache in front of the store
    pub cache: Arc<ConfigCache>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            store: Arc::new(ConfigStore::new()),
            cache: Arc::new(ConfigCache::new(config.cache_ttl())),
            config: Arc::new(config),
        }
    }
}

/// Parts of a request a handler needs, with the body already read.
#[derive(Debug)]
pub struct RouteRequest<'a> {
    pub method: &'a Method,
    pub query: Option<&'a str>,
    pub body: Bytes,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with default routes.
    pub fn new(state: AppState) -> Result<Self, RouterError> {
        let mut router = MatchitRouter::new();

        let routes = [
            ("/config", RouteHandler::ConfigCollection),
            ("/config/", RouteHandler::ConfigCollection),
            ("/config/flush-cache", RouteHandler::FlushCache),
            ("/config/{tenant_id}/{config_type}", RouteHandler::ConfigItem),
            ("/{tenant_id}/{config_type}/submit", RouteHandler::Submit),
        ];
        for (path, handler) in routes {
            router.insert(path, handler).map_err(|e| {
                RouterError::InternalError(format!("Failed to insert {} route: {}", path, e))
            })?;
        }

        Ok(Self {
            inner: router,
            state,
        })
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// Every failure is turned into a JSON error response.
    pub async fn route(&self, req: Request<hyper::body::Incoming>) -> Response<Bytes> {
        let (parts, body) = req.into_parts();
        let body = match read_request_body_with_timeout(body, self.state.config.request_timeout_ms)
            .await
        {
            Ok(body) => body,
            Err(err) => return err.into(),
        };
        self.dispatch(&parts.method, parts.uri.path(), parts.uri.query(), body)
    }

    /// Dispatches a request whose body has been read.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - Request path
    /// * `query` - Raw query string, if any
    /// * `body` - Request body
    ///
    /// # Returns
    /// The response to send, errors included.
    pub fn dispatch(
        &self,
        method: &Method,
        path: &str,
        query: Option<&str>,
        body: Bytes,
    ) -> Response<Bytes> {
        tracing::debug!(method = %method, path = %path, "Routing request");

        let result = match self.inner.at(path) {
            Ok(matched) => {
                let request = RouteRequest {
                    method,
                    query,
                    body,
                };
                matched
                    .value
                    .handle(&request, &matched.params, &self.state)
            }
            Err(_) => Err(RouterError::NotFound(format!(
                "No route found for {}",
                path
            ))),
        };

        result.unwrap_or_else(|err| {
            tracing::warn!(method = %method, path = %path, "Request failed: {}", err);
            err.into()
        })
    }
}

/// Route handler function.
enum RouteHandler {
    ConfigCollection,
    ConfigItem,
    FlushCache,
    Submit,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    fn handle(
        &self,
        req: &RouteRequest<'_>,
        params: &matchit::Params<'_, '_>,
        state: &AppState,
    ) -> Result<Response<Bytes>, RouterError> {
        match self {
            RouteHandler::ConfigCollection => match *req.method {
                Method::GET => handlers::list_configs(req, state),
                Method::POST => handlers::create_config(req, state),
                _ => Err(RouterError::MethodNotAllowed),
            },
            RouteHandler::ConfigItem => match *req.method {
                Method::GET => handlers::get_config(params, state),
                Method::PUT => handlers::update_config(req, params, state),
                Method::DELETE => handlers::delete_config(params, state),
                _ => Err(RouterError::MethodNotAllowed),
            },
            RouteHandler::FlushCache => match *req.method {
                Method::POST => handlers::flush_cache(state),
                _ => Err(RouterError::MethodNotAllowed),
            },
            RouteHandler::Submit => match *req.method {
                Method::POST => handlers::submit_form(req, params, state),
                _ => Err(RouterError::MethodNotAllowed),
            },
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
    Conflict(String),
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::Conflict(msg) => write!(f, "Conflict: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

impl RouterError {
    pub fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 408,
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) => 404,
            RouterError::Conflict(_) => 409,
        }
    }
}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let detail = match err {
            RouterError::MethodNotAllowed => "Method Not Allowed".to_string(),
            RouterError::Timeout => "Request Timeout".to_string(),
            RouterError::InternalError(msg)
            | RouterError::BadRequest(msg)
            | RouterError::NotFound(msg)
            | RouterError::Conflict(msg) => msg,
        };

        let error_response = handlers::error_response(detail);
        let body = serde_json::to_vec(&error_response).unwrap_or_else(|e| {
            format!("{{\"detail\":\"Failed to serialize error: {}\"}}", e).into_bytes()
        });

        let mut response = Response::new(Bytes::from(body));
        *response.status_mut() =
            hyper::StatusCode::from_u16(status).unwrap_or(hyper::StatusCode::INTERNAL_SERVER_ERROR);
        response.headers_mut().insert(
            hyper::header::CONTENT_TYPE,
            hyper::header::HeaderValue::from_static("application/json"),
        );
        response
    }
}
