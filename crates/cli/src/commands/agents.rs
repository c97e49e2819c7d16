//! Agent management commands

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use console_lib::{
    Agent, AgentConfig, AgentSettingsSync, AgentToggleField, BackendGateway, HttpGateway,
};
use tabled::Tabled;

use crate::output::{self, OutputFormat};

/// Row for the agent list table
#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "Agent")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "State")]
    enabled: String,
    #[tabled(rename = "Auto Switch")]
    auto_switch: String,
    #[tabled(rename = "Auto Terminate")]
    auto_terminate: String,
    #[tabled(rename = "Instances")]
    instances: String,
    #[tabled(rename = "Last Heartbeat")]
    heartbeat: String,
}

impl AgentRow {
    fn from_agent(agent: &Agent) -> Self {
        Self {
            id: agent.id.clone(),
            status: output::agent_status_badge(agent.status),
            enabled: output::enabled_badge(agent.enabled),
            auto_switch: output::on_off_badge(agent.auto_switch_enabled),
            auto_terminate: output::on_off_badge(agent.auto_terminate_enabled),
            instances: agent.instance_count.to_string(),
            heartbeat: agent
                .last_heartbeat
                .map(|ts| output::format_timestamp(&ts))
                .unwrap_or_else(|| "never".to_string()),
        }
    }
}

/// List agents registered for the client.
pub async fn list_agents(
    gateway: Arc<HttpGateway>,
    client_id: &str,
    format: OutputFormat,
) -> Result<()> {
    let sync = AgentSettingsSync::new(gateway, client_id);
    let agents = sync.reload().await.context("failed to load agents")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&agents)?);
        }
        OutputFormat::Table => {
            println!("{}", "Agents".bold());
            println!("{}", "=".repeat(60));
            if agents.is_empty() {
                println!("{}", "No agents registered for this client".yellow());
                return Ok(());
            }
            let rows: Vec<AgentRow> = agents.iter().map(AgentRow::from_agent).collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}

/// Enable or disable an agent.
pub async fn set_enabled(
    gateway: Arc<HttpGateway>,
    client_id: &str,
    agent_id: &str,
    enabled: bool,
) -> Result<()> {
    let sync = AgentSettingsSync::new(gateway, client_id);
    sync.reload().await.context("failed to load agents")?;
    sync.set_enabled(agent_id, enabled)
        .await
        .with_context(|| format!("failed to update agent {agent_id}"))?;

    output::print_success(&format!(
        "Agent {agent_id} {}",
        if enabled { "enabled" } else { "disabled" }
    ));
    Ok(())
}

/// Toggle one of the agent's auto settings, reporting the reconciled state
/// on failure.
pub async fn toggle_setting(
    gateway: Arc<HttpGateway>,
    client_id: &str,
    agent_id: &str,
    field: AgentToggleField,
) -> Result<()> {
    let sync = AgentSettingsSync::new(gateway, client_id);
    sync.reload().await.context("failed to load agents")?;

    let label = match field {
        AgentToggleField::AutoSwitch => "auto switch",
        AgentToggleField::AutoTerminate => "auto terminate",
    };

    match sync.toggle_setting(agent_id, field).await {
        Ok(value) => {
            output::print_success(&format!(
                "Agent {agent_id}: {label} is now {}",
                if value { "on" } else { "off" }
            ));
            Ok(())
        }
        Err(err) => {
            output::print_error(&format!("Failed to update {label}: {err}"));
            // The sync already reconciled from backend truth; show it.
            if let Some(agent) = sync.agents().await.iter().find(|a| a.id == agent_id) {
                let current = match field {
                    AgentToggleField::AutoSwitch => agent.auto_switch_enabled,
                    AgentToggleField::AutoTerminate => agent.auto_terminate_enabled,
                };
                println!(
                    "{label} remains {}",
                    if current { "on" } else { "off" }
                );
            }
            Err(err).context("settings update failed")
        }
    }
}

/// Write decision thresholds for an agent.
pub async fn configure(
    gateway: Arc<HttpGateway>,
    agent_id: &str,
    min_savings_percent: f64,
    risk_threshold: f64,
    max_switches_per_week: u32,
    min_pool_duration_hours: u32,
) -> Result<()> {
    let config = AgentConfig {
        min_savings_percent,
        risk_threshold,
        max_switches_per_week,
        min_pool_duration_hours,
        ..AgentConfig::default()
    };

    gateway
        .update_agent_config(agent_id, &config)
        .await
        .with_context(|| format!("failed to save configuration for agent {agent_id}"))?;

    output::print_success(&format!("Configuration saved for agent {agent_id}"));
    Ok(())
}
