//! Force-switch command

use std::sync::Arc;

use anyhow::{bail, Result};
use console_lib::{
    ConfirmationProvider, ConsoleError, HttpGateway, SwitchCommand, SwitchCommandDispatcher,
};

use crate::confirm::{AutoConfirm, TerminalConfirmation};
use crate::output;

/// Build, confirm, and dispatch a force-switch command.
pub async fn force_switch(
    gateway: Arc<HttpGateway>,
    instance_id: &str,
    pool: Option<String>,
    ondemand: bool,
    instance_type: Option<String>,
    yes: bool,
) -> Result<()> {
    let mut command = match (pool, ondemand) {
        (Some(pool_id), false) => SwitchCommand::to_pool(pool_id),
        (None, true) => SwitchCommand::to_on_demand(),
        (None, false) => bail!("specify a target: --pool <id> or --ondemand"),
        (Some(_), true) => unreachable!("clap rejects --pool with --ondemand"),
    };
    if let Some(instance_type) = instance_type {
        command = command.with_instance_type(instance_type);
    }

    let confirmation: Arc<dyn ConfirmationProvider> = if yes {
        Arc::new(AutoConfirm)
    } else {
        Arc::new(TerminalConfirmation)
    };
    let dispatcher = SwitchCommandDispatcher::new(gateway, confirmation);

    match dispatcher.dispatch(instance_id, &command).await {
        Ok(outcome) => {
            output::print_success(&format!(
                "Switch command queued for {}. The agent typically executes it within ~1 minute.",
                outcome.target_label
            ));
            Ok(())
        }
        Err(ConsoleError::ConfirmationDeclined) => {
            output::print_warning("Switch cancelled");
            Ok(())
        }
        Err(err) => bail!("{err}"),
    }
}
