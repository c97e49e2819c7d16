//! Spot Placement Console CLI
//!
//! A command-line console for inspecting an instance's cost placement,
//! queueing force-switch commands, and managing switching agents.

mod commands;
mod config;
mod confirm;
mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console_lib::HttpGateway;
use tracing_subscriber::EnvFilter;

use commands::{agents, decisions, health, inspect, instances, switch};

/// Spot Placement Console CLI
#[derive(Parser)]
#[command(name = "spotctl")]
#[command(author, version, about = "Operator console for spot placement switching", long_about = None)]
pub struct Cli {
    /// Backend API endpoint URL (can also be set via SPOTCTL_API_URL env var)
    #[arg(long, env = "SPOTCTL_API_URL")]
    pub api_url: Option<String>,

    /// Client account id (can also be set via SPOTCTL_CLIENT_ID env var)
    #[arg(long, env = "SPOTCTL_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List instances managed for the client
    Instances,

    /// Inspect an instance's placement, pricing, and price history
    Inspect {
        /// Instance id
        instance: String,

        /// Price history lookback window in days
        #[arg(long, default_value_t = 7)]
        history_days: u32,
    },

    /// Queue a force-switch command for an instance
    Switch {
        /// Instance id
        instance: String,

        /// Target pool id
        #[arg(long, conflicts_with = "ondemand")]
        pool: Option<String>,

        /// Switch to the on-demand fallback instead of a pool
        #[arg(long)]
        ondemand: bool,

        /// Override the instance type as part of the switch
        #[arg(long)]
        instance_type: Option<String>,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Manage switching agents
    #[command(subcommand)]
    Agents(AgentsCommands),

    /// Show the agent decision audit feed
    Decisions {
        /// Refresh every 30 seconds until interrupted
        #[arg(long)]
        watch: bool,
    },

    /// Show backend system health
    Health {
        /// Refresh every 30 seconds until interrupted
        #[arg(long)]
        watch: bool,
    },

    /// Manage CLI configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum AgentsCommands {
    /// List agents registered for the client
    List,

    /// Enable an agent
    Enable {
        /// Agent id
        agent: String,
    },

    /// Disable an agent
    Disable {
        /// Agent id
        agent: String,
    },

    /// Toggle the auto-switch setting
    AutoSwitch {
        /// Agent id
        agent: String,
    },

    /// Toggle the auto-terminate setting
    AutoTerminate {
        /// Agent id
        agent: String,
    },

    /// Update an agent's decision thresholds
    Configure {
        /// Agent id
        agent: String,

        /// Only switch if savings exceed this percentage
        #[arg(long, default_value_t = 15.0)]
        min_savings_percent: f64,

        /// Maximum acceptable risk score (0-1)
        #[arg(long, default_value_t = 0.3)]
        risk_threshold: f64,

        /// Prevent excessive switching
        #[arg(long, default_value_t = 10)]
        max_switches_per_week: u32,

        /// Minimum hours to stay in a pool
        #[arg(long, default_value_t = 2)]
        min_pool_duration_hours: u32,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the stored configuration
    Show,

    /// Update stored configuration values
    Set {
        /// Backend API endpoint URL
        #[arg(long)]
        api_url: Option<String>,

        /// Client account id
        #[arg(long)]
        client_id: Option<String>,
    },
}

const DEFAULT_API_URL: &str = "http://localhost:8080";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let stored = config::Config::load().unwrap_or_default();

    // Config subcommands do not need a gateway.
    if let Commands::Config(config_cmd) = &cli.command {
        return match config_cmd {
            ConfigCommands::Show => commands::config_show(&stored, cli.format),
            ConfigCommands::Set { api_url, client_id } => {
                commands::config_set(stored, api_url.clone(), client_id.clone())
            }
        };
    }

    let api_url = cli
        .api_url
        .clone()
        .or_else(|| stored.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let gateway = Arc::new(
        HttpGateway::new(&api_url)
            .with_context(|| format!("failed to create API client for {api_url}"))?,
    );

    match cli.command {
        Commands::Instances => {
            let client_id = require_client_id(&cli.client_id, &stored)?;
            instances::list_instances(gateway, &client_id, cli.format).await?;
        }
        Commands::Inspect {
            instance,
            history_days,
        } => {
            inspect::show_instance(gateway, &instance, history_days, cli.format).await?;
        }
        Commands::Switch {
            instance,
            pool,
            ondemand,
            instance_type,
            yes,
        } => {
            switch::force_switch(gateway, &instance, pool, ondemand, instance_type, yes).await?;
        }
        Commands::Agents(agents_cmd) => {
            let client_id = require_client_id(&cli.client_id, &stored)?;
            match agents_cmd {
                AgentsCommands::List => {
                    agents::list_agents(gateway, &client_id, cli.format).await?;
                }
                AgentsCommands::Enable { agent } => {
                    agents::set_enabled(gateway, &client_id, &agent, true).await?;
                }
                AgentsCommands::Disable { agent } => {
                    agents::set_enabled(gateway, &client_id, &agent, false).await?;
                }
                AgentsCommands::AutoSwitch { agent } => {
                    agents::toggle_setting(
                        gateway,
                        &client_id,
                        &agent,
                        console_lib::AgentToggleField::AutoSwitch,
                    )
                    .await?;
                }
                AgentsCommands::AutoTerminate { agent } => {
                    agents::toggle_setting(
                        gateway,
                        &client_id,
                        &agent,
                        console_lib::AgentToggleField::AutoTerminate,
                    )
                    .await?;
                }
                AgentsCommands::Configure {
                    agent,
                    min_savings_percent,
                    risk_threshold,
                    max_switches_per_week,
                    min_pool_duration_hours,
                } => {
                    agents::configure(
                        gateway,
                        &agent,
                        min_savings_percent,
                        risk_threshold,
                        max_switches_per_week,
                        min_pool_duration_hours,
                    )
                    .await?;
                }
            }
        }
        Commands::Decisions { watch } => {
            let client_id = require_client_id(&cli.client_id, &stored)?;
            decisions::show_decisions(gateway, client_id, watch, cli.format).await?;
        }
        Commands::Health { watch } => {
            health::show_health(gateway, watch, cli.format).await?;
        }
        Commands::Config(_) => unreachable!("handled above"),
    }

    Ok(())
}

fn require_client_id(flag: &Option<String>, stored: &config::Config) -> Result<String> {
    flag.clone()
        .or_else(|| stored.client_id.clone())
        .context("client id is required: pass --client-id, set SPOTCTL_CLIENT_ID, or run `spotctl config set --client-id <id>`")
}
