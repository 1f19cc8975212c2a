//! Client for the tenant form configuration store.
//!
//! Wraps the REST surface (CRUD, list, cache flush, submission) behind typed
//! outcomes, and provides a per-key request sequence guard so stale responses
//! never overwrite newer ones.

pub mod client;
pub mod config;
pub mod error;
pub mod sequence;

pub use client::{Ack, StoreClient};
pub use config::ClientConfig;
pub use error::ClientError;
pub use sequence::{Outcome, SequenceGuard, Ticket};
