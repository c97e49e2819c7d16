//! Instance inspection command

use std::sync::Arc;

use anyhow::{bail, Result};
use colored::Colorize;
use console_lib::{
    DetailConfig, DetailOrchestrator, DetailState, HistoryBucket, HttpGateway, InstanceDetail,
};
use tabled::Tabled;

use crate::output::{self, OutputFormat};

/// Row for the ranked pool table
#[derive(Tabled)]
struct PoolRow {
    #[tabled(rename = "Pool")]
    id: String,
    #[tabled(rename = "Price/hr")]
    price: String,
    #[tabled(rename = "Savings")]
    savings: String,
    #[tabled(rename = "Saves/hr")]
    delta: String,
    #[tabled(rename = "")]
    badge: String,
}

/// Row for the price history table
#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Avg")]
    avg: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
}

/// Load and render the inspection view for one instance.
pub async fn show_instance(
    gateway: Arc<HttpGateway>,
    instance_id: &str,
    history_days: u32,
    format: OutputFormat,
) -> Result<()> {
    let orchestrator = DetailOrchestrator::with_config(
        gateway,
        DetailConfig {
            history_lookback_days: history_days,
            history_bucket: HistoryBucket::Hour,
        },
    );

    match orchestrator.open(instance_id).await {
        DetailState::Ready(detail) => {
            render_detail(&detail, history_days, format)?;
        }
        DetailState::Error { message, .. } => {
            bail!("{message} (retry once the backend is reachable)");
        }
        // open() drives the cycle to completion, so these are unreachable
        // unless a concurrent caller shares the orchestrator.
        DetailState::Idle | DetailState::Loading { .. } => {
            bail!("inspection did not complete");
        }
    }

    Ok(())
}

fn render_detail(detail: &InstanceDetail, history_days: u32, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(detail)?);
        }
        OutputFormat::Table => {
            render_metrics(detail);
            render_pools(detail);
            render_options(detail);
            render_history(detail, history_days);
        }
    }
    Ok(())
}

fn render_metrics(detail: &InstanceDetail) {
    let metrics = &detail.metrics;

    println!("{}", format!("Instance {}", detail.instance_id).bold());
    println!("{}", "=".repeat(60));
    println!("Uptime:                 {:.1}h", metrics.uptime_hours);
    println!(
        "Total switches:         {} ({} in last 7 days)",
        metrics.total_switches, metrics.switches_last_7_days
    );
    println!(
        "Total savings:          {} ({} last 30 days)",
        output::format_dollars(metrics.total_savings).green().bold(),
        output::format_dollars(metrics.savings_last_30_days).green()
    );
    println!(
        "Current prices:         spot {}  on-demand {}",
        output::format_price(metrics.spot_price).bold(),
        output::format_price(metrics.on_demand_price).bold()
    );
    println!();
}

fn render_pools(detail: &InstanceDetail) {
    println!("{}", format!("Spot Pools ({})", detail.ranked.len()).bold());
    println!("{}", "-".repeat(60));

    if detail.ranked.is_empty() {
        println!("{}", "No spot pools available".yellow());
    } else {
        let rows: Vec<PoolRow> = detail
            .ranked
            .iter()
            .map(|ranked| PoolRow {
                id: ranked.pool.id.clone(),
                price: output::format_price(ranked.pool.price),
                savings: output::format_percent(ranked.savings_percent),
                delta: output::format_price(ranked.savings_delta),
                badge: if ranked.best_price {
                    "Best Price".green().bold().to_string()
                } else {
                    String::new()
                },
            })
            .collect();

        let table = tabled::Table::new(rows)
            .with(tabled::settings::Style::rounded())
            .to_string();
        println!("{}", table);
    }

    println!(
        "On-Demand (fallback):   {}  {}",
        output::format_price(detail.pricing.on_demand.price).bold(),
        "guaranteed availability".dimmed()
    );
    println!();
}

fn render_options(detail: &InstanceDetail) {
    let options = &detail.options;
    if options.instance_types.is_empty() {
        return;
    }

    println!("{}", "Advanced Switching".bold());
    println!("{}", "-".repeat(60));
    if let Some(current) = &options.current_instance_type {
        println!("Current instance type:  {}", current.cyan());
    }
    println!(
        "Available types:        {}",
        options.instance_types.join(", ")
    );
    println!();
}

fn render_history(detail: &InstanceDetail, history_days: u32) {
    println!(
        "{}",
        format!("Price History ({history_days} Days)").bold()
    );
    println!("{}", "-".repeat(60));

    if detail.history.is_empty() {
        if detail.history_degraded {
            println!(
                "{}",
                "Price history is not available for this instance".yellow()
            );
        } else {
            println!("{}", "No price history recorded".dimmed());
        }
        return;
    }

    let rows: Vec<HistoryRow> = detail
        .history
        .iter()
        .map(|point| HistoryRow {
            time: point.time.clone(),
            avg: output::format_price(point.avg_price),
            min: output::format_price(point.min_price),
            max: output::format_price(point.max_price),
        })
        .collect();

    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);
}
