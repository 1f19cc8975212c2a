//! REST server for tenant form configurations.
//!
//! Serves configuration CRUD, listing, cache flush and form submission
//! from an in-memory store until Ctrl+C.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use form_config_api::{AppState, Router, Server, ServerConfig};
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the configuration server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Request body read timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Lifetime of cached configurations in seconds
    #[arg(long, default_value_t = 3600)]
    cache_ttl_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig {
        request_timeout_ms: args.request_timeout_ms,
        cache_ttl_secs: args.cache_ttl_secs,
    };
    let router = Router::new(AppState::new(config)).context("Failed to build router")?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let server = Server::bind(addr, router)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        request_timeout_ms = args.request_timeout_ms,
        cache_ttl_secs = args.cache_ttl_secs,
        "Starting form configuration server"
    );

    server
        .serve_until(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl_c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("Server error")?;

    Ok(())
}
