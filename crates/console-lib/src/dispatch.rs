//! Force-switch dispatch
//!
//! Turns a selected target into a confirmed, de-duplicated, asynchronous
//! mutating request. The per-(instance, target) in-flight marker is the
//! only mutual-exclusion primitive in the core; it is claimed after the
//! operator confirms and released unconditionally when the dispatch
//! finishes, on every exit path.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{info, warn};

use crate::error::ConsoleError;
use crate::gateway::BackendGateway;
use crate::models::{SwitchAck, SwitchCommand, SwitchTarget};

/// Capability for obtaining explicit operator confirmation before a
/// mutating action. Injected so dispatch is testable without a terminal.
#[async_trait]
pub trait ConfirmationProvider: Send + Sync {
    /// Present the prompt and return whether the operator approved.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Result of a successfully queued switch command.
#[derive(Debug, Clone)]
pub struct SwitchOutcome {
    /// Human-readable target, e.g. "On-Demand" or "Pool p1".
    pub target_label: String,
    pub ack: SwitchAck,
}

type InFlightKey = (String, String);

/// Dispatches force-switch commands under per-target concurrency control.
pub struct SwitchCommandDispatcher {
    gateway: Arc<dyn BackendGateway>,
    confirmation: Arc<dyn ConfirmationProvider>,
    in_flight: DashMap<InFlightKey, ()>,
}

impl SwitchCommandDispatcher {
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        confirmation: Arc<dyn ConfirmationProvider>,
    ) -> Self {
        Self {
            gateway,
            confirmation,
            in_flight: DashMap::new(),
        }
    }

    /// Whether a command for this (instance, target) pair is outstanding.
    /// Views use this to disable the matching control.
    pub fn is_in_flight(&self, instance_id: &str, target: &SwitchTarget) -> bool {
        self.in_flight
            .contains_key(&(instance_id.to_string(), target.key().to_string()))
    }

    /// Validate, confirm, and queue a force-switch command.
    ///
    /// Exactly one mutating call is made per successful invocation; no
    /// automatic retries. The backend contract is fire-and-queue: success
    /// means accepted for the managing agent, which typically executes the
    /// switch within about a minute.
    pub async fn dispatch(
        &self,
        instance_id: &str,
        command: &SwitchCommand,
    ) -> Result<SwitchOutcome, ConsoleError> {
        validate(command)?;
        let target_label = command.target_label();

        let prompt = format!(
            "Force switch instance {instance_id} to {target_label}? \
             The command is queued for the managing agent and typically executes within ~1 minute."
        );
        if !self.confirmation.confirm(&prompt).await {
            return Err(ConsoleError::ConfirmationDeclined);
        }

        let key = (instance_id.to_string(), command.target_key().to_string());
        match self.in_flight.entry(key.clone()) {
            Entry::Occupied(_) => {
                return Err(ConsoleError::Conflict {
                    instance_id: instance_id.to_string(),
                    target_label,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(());
            }
        }
        // Released on drop, whatever path the dispatch takes from here.
        let _guard = InFlightGuard {
            markers: &self.in_flight,
            key,
        };

        match self.gateway.force_switch(instance_id, command).await {
            Ok(ack) => {
                info!(
                    event = "switch_dispatched",
                    instance_id = %instance_id,
                    target = %target_label,
                    "Switch command queued for agent execution"
                );
                Ok(SwitchOutcome { target_label, ack })
            }
            Err(err) => {
                warn!(
                    event = "switch_rejected",
                    instance_id = %instance_id,
                    target = %target_label,
                    error = %err,
                    "Switch command rejected by backend"
                );
                Err(ConsoleError::CommandRejected {
                    message: err.message().to_string(),
                })
            }
        }
    }
}

fn validate(command: &SwitchCommand) -> Result<(), ConsoleError> {
    if let SwitchTarget::Pool { pool_id } = &command.target {
        if pool_id.is_empty() {
            return Err(ConsoleError::InvalidCommand(
                "pool target requires a pool id".to_string(),
            ));
        }
    }
    if let Some(instance_type) = &command.instance_type {
        if instance_type.is_empty() {
            return Err(ConsoleError::InvalidCommand(
                "instance type override must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

struct InFlightGuard<'a> {
    markers: &'a DashMap<InFlightKey, ()>,
    key: InFlightKey,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.markers.remove(&self.key);
    }
}
