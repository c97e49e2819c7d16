//! Confirmation providers for mutating commands

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use colored::Colorize;
use console_lib::ConfirmationProvider;

/// Interactive y/N prompt on the controlling terminal.
pub struct TerminalConfirmation;

#[async_trait]
impl ConfirmationProvider for TerminalConfirmation {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        // Stdin reads are blocking; keep them off the runtime threads.
        tokio::task::spawn_blocking(move || {
            print!("{} {} ", prompt, "[y/N]".bold());
            if io::stdout().flush().is_err() {
                return false;
            }
            let mut line = String::new();
            if io::stdin().lock().read_line(&mut line).is_err() {
                return false;
            }
            matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
        })
        .await
        .unwrap_or(false)
    }
}

/// Non-interactive provider for `--yes` runs: grants every confirmation.
pub struct AutoConfirm;

#[async_trait]
impl ConfirmationProvider for AutoConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
