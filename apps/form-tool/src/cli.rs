use std::path::PathBuf;

use clap::{Parser, Subcommand};
use form_engine_core::ConfigType;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Store base URL; falls back to FORM_ENGINE_API_URL, then http://localhost:8000
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Whole-request timeout in milliseconds
    #[arg(long, global = true, default_value_t = 30000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one configuration
    Get {
        tenant_id: String,
        config_type: ConfigType,
    },

    /// List configurations, optionally filtered
    List {
        #[arg(long)]
        tenant_id: Option<String>,

        #[arg(long = "type")]
        config_type: Option<ConfigType>,
    },

    /// Create a configuration from a JSON file
    Create {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Replace description and fields from a JSON file
    Update {
        tenant_id: String,
        config_type: ConfigType,

        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete a configuration
    Delete {
        tenant_id: String,
        config_type: ConfigType,
    },

    /// Drop the backend's configuration cache
    FlushCache,

    /// Check a configuration file locally without contacting the store
    Check {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Validate values against the stored form, then submit them
    Submit {
        tenant_id: String,
        config_type: ConfigType,

        /// JSON object mapping field names to values
        #[arg(short, long)]
        file: PathBuf,
    },
}
