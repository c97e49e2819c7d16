//! Decision audit feed command

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use console_lib::{BackendGateway, DecisionFeed, HttpGateway, PollingRefresher};
use tabled::Tabled;

use crate::output::{self, OutputFormat};

const WATCH_PERIOD: Duration = Duration::from_secs(30);

/// Row for the decision table
#[derive(Tabled)]
struct DecisionRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Instance")]
    instance: String,
    #[tabled(rename = "Decision")]
    decision: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Health")]
    health: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

/// Show the decision feed, optionally refreshing on a 30s cadence until
/// interrupted.
pub async fn show_decisions(
    gateway: Arc<HttpGateway>,
    client_id: String,
    watch: bool,
    format: OutputFormat,
) -> Result<()> {
    if !watch {
        return render(gateway.as_ref(), &client_id, format).await;
    }

    let refresher = PollingRefresher::spawn(WATCH_PERIOD, move || {
        let gateway = gateway.clone();
        let client_id = client_id.clone();
        async move {
            if let Err(err) = render(gateway.as_ref(), &client_id, format).await {
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

async fn render(gateway: &HttpGateway, client_id: &str, format: OutputFormat) -> Result<()> {
    let feed = gateway
        .agent_decisions(client_id)
        .await
        .context("failed to load agent decisions")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&feed)?);
        }
        OutputFormat::Table => {
            render_table(&feed);
        }
    }
    Ok(())
}

fn render_table(feed: &DecisionFeed) {
    println!("{}", "Agent Decision History".bold());
    println!("{}", "=".repeat(60));

    if let Some(stats) = &feed.stats {
        println!(
            "Decisions: {}   Success rate: {}   Avg confidence: {}   Avg health: {}",
            stats.total_decisions,
            output::format_percent(stats.success_rate),
            output::confidence_badge(stats.avg_confidence),
            output::health_badge(stats.avg_health)
        );
        println!();
    }

    if feed.decisions.is_empty() {
        println!("{}", "No decisions recorded".yellow());
        return;
    }

    let rows: Vec<DecisionRow> = feed
        .decisions
        .iter()
        .map(|decision| DecisionRow {
            time: output::format_timestamp(&decision.timestamp),
            instance: decision.instance_id.clone(),
            decision: output::decision_badge(decision.decision),
            confidence: output::confidence_badge(decision.confidence),
            health: output::health_badge(decision.health),
            outcome: output::outcome_badge(decision.outcome),
            reason: decision.reason.clone().unwrap_or_else(|| "n/a".to_string()),
        })
        .collect();

    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);
}
