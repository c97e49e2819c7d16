//! Backend system health command

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use console_lib::{BackendGateway, EngineStatus, HttpGateway, PollingRefresher, SystemHealth};

use crate::output::{self, OutputFormat};

const WATCH_PERIOD: Duration = Duration::from_secs(30);

/// Show backend system health, optionally refreshing every 30 seconds.
pub async fn show_health(
    gateway: Arc<HttpGateway>,
    watch: bool,
    format: OutputFormat,
) -> Result<()> {
    if !watch {
        return render(gateway.as_ref(), format).await;
    }

    let refresher = PollingRefresher::spawn(WATCH_PERIOD, move || {
        let gateway = gateway.clone();
        async move {
            if let Err(err) = render(gateway.as_ref(), format).await {
                output::print_error(&format!("refresh failed: {err}"));
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to wait for interrupt")?;
    refresher.stop().await;
    Ok(())
}

async fn render(gateway: &HttpGateway, format: OutputFormat) -> Result<()> {
    let health = gateway
        .system_health()
        .await
        .context("failed to load system health")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
        OutputFormat::Table => {
            render_table(&health);
        }
    }
    Ok(())
}

fn render_table(health: &SystemHealth) {
    println!("{}", "System Health".bold());
    println!("{}", "=".repeat(60));

    render_engine("Decision Engine", health.decision_engine_status.as_ref());
    render_engine("ML Models", health.ml_models_status.as_ref());

    match &health.database_status {
        Some(db) if db.connected => {
            println!("Database:               {}", "connected".green())
        }
        Some(_) => println!("Database:               {}", "disconnected".red()),
        None => println!("Database:               {}", "unknown".dimmed()),
    }
}

fn render_engine(name: &str, status: Option<&EngineStatus>) {
    let label = format!("{name}:");
    match status {
        Some(engine) => {
            let state = if engine.loaded {
                "running".green().to_string()
            } else {
                "not loaded".red().to_string()
            };
            let detail = [
                engine.engine_type.as_deref(),
                engine.version.as_deref(),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
            if detail.is_empty() {
                println!("{label:<24}{state}");
            } else {
                println!("{label:<24}{state} ({detail})");
            }
        }
        None => println!("{label:<24}{}", "unknown".dimmed()),
    }
}
