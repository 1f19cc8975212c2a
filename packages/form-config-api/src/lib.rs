//! REST backend for tenant form configurations.
//!
//! Provides HTTP endpoints for configuration CRUD, listing, cache
//! invalidation and form submission, backed by an in-memory store.

pub mod cache;
pub mod config;
pub mod handlers;
pub mod router;
pub mod server;
pub mod store;

pub use config::ServerConfig;
pub use router::{AppState, Router, RouterError};
pub use server::Server;
pub use store::{ConfigStore, ListFilter, StoreError};
