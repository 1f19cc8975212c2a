//! Subcommand implementations.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use form_engine_core::{try_submit, Configuration, ConfigurationPatch, Snapshot};
use form_store_client::StoreClient;

use crate::cli::Commands;

/// Reads and parses a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Checks a configuration file without any network access.
pub fn check_file(path: &Path) -> Result<Configuration> {
    let configuration: Configuration = load_json(path)?;
    configuration
        .check()
        .with_context(|| format!("{} is not a valid configuration", path.display()))?;
    Ok(configuration)
}

pub async fn run(client: &StoreClient, command: Commands) -> Result<()> {
    match command {
        Commands::Get {
            tenant_id,
            config_type,
        } => print_json(&client.get(&tenant_id, config_type).await?),
        Commands::List {
            tenant_id,
            config_type,
        } => print_json(&client.list(tenant_id.as_deref(), config_type).await?),
        Commands::Create { file } => {
            let draft: Configuration = load_json(&file)?;
            print_json(&client.create(&draft).await?)
        }
        Commands::Update {
            tenant_id,
            config_type,
            file,
        } => {
            let patch: ConfigurationPatch = load_json(&file)?;
            print_json(&client.update(&tenant_id, config_type, &patch).await?)
        }
        Commands::Delete {
            tenant_id,
            config_type,
        } => print_json(&client.delete(&tenant_id, config_type).await?),
        Commands::FlushCache => print_json(&client.flush_cache().await?),
        Commands::Check { file } => {
            let configuration = check_file(&file)?;
            println!(
                "{} is valid ({} fields)",
                configuration.key(),
                configuration.fields.len()
            );
            Ok(())
        }
        Commands::Submit {
            tenant_id,
            config_type,
            file,
        } => {
            let snapshot: Snapshot = load_json(&file)?;
            let configuration = client.get(&tenant_id, config_type).await?;
            let submission = match try_submit(&configuration, &snapshot) {
                Ok(submission) => submission,
                Err(failure) => {
                    for violation in &failure.violations {
                        eprintln!("{}: {}", violation.field_name, violation.message);
                    }
                    bail!(failure);
                }
            };
            print_json(&client.submit(&submission).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_check_file_accepts_editor_payload() {
        let file = write_temp(
            r#"{
                "tenant_id": "t1",
                "type": "patient-registration",
                "fields": [
                    {"id": "f1", "type": "text", "label": "First name", "name": "first_name",
                     "options": [], "content": "",
                     "validation": {"required": true, "min_length": 2}}
                ]
            }"#,
        );
        let configuration = check_file(file.path()).unwrap();
        assert_eq!(configuration.fields.len(), 1);
    }

    #[test]
    fn test_check_file_rejects_bad_select() {
        let file = write_temp(
            r#"{
                "tenant_id": "t1",
                "type": "patient-details",
                "fields": [
                    {"id": "f1", "type": "select", "label": "Sex", "name": "sex", "options": []}
                ]
            }"#,
        );
        let err = check_file(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("no options"));
    }

    #[test]
    fn test_load_json_reports_path() {
        let file = write_temp("{not json");
        let err = load_json::<Snapshot>(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }
}
