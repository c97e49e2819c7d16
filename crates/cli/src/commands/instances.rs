//! Instance list command

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use console_lib::{BackendGateway, HttpGateway, Instance, InstanceMode};
use tabled::Tabled;

use crate::output::{self, OutputFormat};

/// Row for the instance list table
#[derive(Tabled)]
struct InstanceRow {
    #[tabled(rename = "Instance")]
    id: String,
    #[tabled(rename = "Type")]
    instance_type: String,
    #[tabled(rename = "AZ")]
    az: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Pool")]
    pool: String,
    #[tabled(rename = "Spot/hr")]
    spot_price: String,
    #[tabled(rename = "Savings")]
    savings: String,
    #[tabled(rename = "Last Switch")]
    last_switch: String,
}

impl InstanceRow {
    fn from_instance(instance: &Instance) -> Self {
        let savings = if instance.on_demand_price > 0.0 {
            (instance.on_demand_price - instance.spot_price) / instance.on_demand_price * 100.0
        } else {
            0.0
        };
        Self {
            id: instance.id.clone(),
            instance_type: instance.instance_type.clone(),
            az: instance.availability_zone.clone(),
            mode: mode_badge(instance.mode),
            pool: instance.pool_id.clone().unwrap_or_else(|| "-".to_string()),
            spot_price: output::format_price(instance.spot_price),
            savings: output::format_percent(savings),
            last_switch: instance
                .last_switch
                .map(|ts| output::format_timestamp(&ts))
                .unwrap_or_else(|| "never".to_string()),
        }
    }
}

fn mode_badge(mode: InstanceMode) -> String {
    match mode {
        InstanceMode::Spot => "spot".green().to_string(),
        InstanceMode::OnDemand => "ondemand".red().to_string(),
    }
}

/// List instances managed for the client.
pub async fn list_instances(
    gateway: Arc<HttpGateway>,
    client_id: &str,
    format: OutputFormat,
) -> Result<()> {
    let instances = gateway
        .instances(client_id)
        .await
        .context("failed to load instances")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&instances)?);
        }
        OutputFormat::Table => {
            println!("{}", "Instances".bold());
            println!("{}", "=".repeat(60));
            if instances.is_empty() {
                println!("{}", "No instances found for this client".yellow());
                return Ok(());
            }
            let rows: Vec<InstanceRow> = instances.iter().map(InstanceRow::from_instance).collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}
