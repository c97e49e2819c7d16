//! Output formatting utilities

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use colored::Colorize;
use console_lib::{AgentStatus, DecisionKind, DecisionOutcome};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Format an hourly price with the precision the backend quotes
pub fn format_price(price: f64) -> String {
    format!("${:.4}", price)
}

/// Format an accumulated dollar amount
pub fn format_dollars(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Format a savings percentage
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Format a timestamp for display
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

// Status -> badge mappings. Each match is exhaustive so a new variant is a
// compile-time-checked change here, not a silent fallthrough.

pub fn agent_status_badge(status: AgentStatus) -> String {
    match status {
        AgentStatus::Online => "online".green().to_string(),
        AgentStatus::Offline => "offline".red().to_string(),
    }
}

pub fn enabled_badge(enabled: bool) -> String {
    if enabled {
        "enabled".green().to_string()
    } else {
        "disabled".red().to_string()
    }
}

pub fn on_off_badge(on: bool) -> String {
    if on {
        "on".green().to_string()
    } else {
        "off".dimmed().to_string()
    }
}

pub fn decision_badge(kind: DecisionKind) -> String {
    match kind {
        DecisionKind::Switch => "switch".green().to_string(),
        DecisionKind::Hold => "hold".yellow().to_string(),
        DecisionKind::Terminate => "terminate".red().to_string(),
        DecisionKind::Unknown => "unknown".dimmed().to_string(),
    }
}

pub fn outcome_badge(outcome: DecisionOutcome) -> String {
    match outcome {
        DecisionOutcome::Success => "success".green().to_string(),
        DecisionOutcome::Failed => "failed".red().to_string(),
        DecisionOutcome::Pending => "pending".yellow().to_string(),
    }
}

/// Color a 0-100 health score
pub fn health_badge(health: f64) -> String {
    let formatted = format!("{health:.0}");
    if health >= 80.0 {
        formatted.green().to_string()
    } else if health >= 50.0 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

/// Color a 0-100 confidence score
pub fn confidence_badge(confidence: f64) -> String {
    let formatted = format!("{confidence:.0}%");
    if confidence >= 80.0 {
        formatted.green().to_string()
    } else if confidence >= 60.0 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}
