//! CLI command handlers

pub mod agents;
pub mod decisions;
pub mod health;
pub mod inspect;
pub mod instances;
pub mod switch;

use anyhow::Result;

use crate::config::Config;
use crate::output::{self, OutputFormat};

/// Show the stored CLI configuration.
pub fn config_show(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Table => {
            println!(
                "API URL:    {}",
                config.api_url.as_deref().unwrap_or("(not set)")
            );
            println!(
                "Client id:  {}",
                config.client_id.as_deref().unwrap_or("(not set)")
            );
        }
    }
    Ok(())
}

/// Update and persist CLI configuration values.
pub fn config_set(
    mut config: Config,
    api_url: Option<String>,
    client_id: Option<String>,
) -> Result<()> {
    if api_url.is_none() && client_id.is_none() {
        output::print_warning("nothing to update: pass --api-url and/or --client-id");
        return Ok(());
    }
    if api_url.is_some() {
        config.api_url = api_url;
    }
    if client_id.is_some() {
        config.client_id = client_id;
    }
    config.save()?;
    output::print_success("Configuration saved");
    Ok(())
}
