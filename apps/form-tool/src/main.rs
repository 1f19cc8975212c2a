//! CLI for managing tenant form configurations.

mod cli;
mod commands;

use clap::Parser;
use form_store_client::{ClientConfig, StoreClient};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_base_url(url);
    }
    config.request_timeout_ms = cli.timeout_ms;

    let client = StoreClient::new(config)?;
    commands::run(&client, cli.command).await
}
