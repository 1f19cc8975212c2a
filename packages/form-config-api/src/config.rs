//! Server configuration.

use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Lifetime of a cached configuration in seconds
    pub cache_ttl_secs: u64,
}

impl ServerConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5000, // 5 seconds default
            cache_ttl_secs: 3600,     // 1 hour
        }
    }
}
