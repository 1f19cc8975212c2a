//! HTTP endpoint implementations for configuration CRUD and submission.

pub mod config_handlers;
pub mod request_utils;
pub mod response;
pub mod submit_handlers;

pub use config_handlers::{
    create_config, delete_config, flush_cache, get_config, list_configs, update_config,
};
pub use response::{error_response, violations_response, Ack, ErrorResponse, SubmitResponse};
pub use submit_handlers::submit_form;
