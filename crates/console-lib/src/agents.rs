//! Agent settings synchronization
//!
//! Holds the local view of a client's agents and applies optimistic
//! settings toggles against it: flip locally, write to the backend, and on
//! failure replace the whole local view with backend truth rather than
//! undoing field by field.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::GatewayError;
use crate::gateway::BackendGateway;
use crate::models::{Agent, AgentConfig, AgentSettingsPatch};

/// Boolean agent setting reachable through the optimistic toggle path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentToggleField {
    AutoSwitch,
    AutoTerminate,
}

impl AgentToggleField {
    fn patch(&self, value: bool) -> AgentSettingsPatch {
        match self {
            AgentToggleField::AutoSwitch => AgentSettingsPatch {
                auto_switch_enabled: Some(value),
                ..AgentSettingsPatch::default()
            },
            AgentToggleField::AutoTerminate => AgentSettingsPatch {
                auto_terminate_enabled: Some(value),
                ..AgentSettingsPatch::default()
            },
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AgentToggleField::AutoSwitch => "auto_switch_enabled",
            AgentToggleField::AutoTerminate => "auto_terminate_enabled",
        }
    }
}

/// Local agent collection with optimistic updates and wholesale
/// reconciliation.
pub struct AgentSettingsSync {
    gateway: Arc<dyn BackendGateway>,
    client_id: String,
    agents: RwLock<Vec<Agent>>,
}

impl AgentSettingsSync {
    pub fn new(gateway: Arc<dyn BackendGateway>, client_id: impl Into<String>) -> Self {
        Self {
            gateway,
            client_id: client_id.into(),
            agents: RwLock::new(Vec::new()),
        }
    }

    /// Authoritative full re-read from the backend.
    pub async fn reload(&self) -> Result<Vec<Agent>, GatewayError> {
        let fresh = self.gateway.agents(&self.client_id).await?;
        let mut agents = self.agents.write().await;
        *agents = fresh.clone();
        Ok(fresh)
    }

    /// Current local view.
    pub async fn agents(&self) -> Vec<Agent> {
        self.agents.read().await.clone()
    }

    /// Optimistically flip a boolean setting and write it to the backend.
    ///
    /// Returns the new value on success. On write failure the optimistic
    /// state is corrected by a full reload, never rolled back field by
    /// field; the original error is returned either way.
    pub async fn toggle_setting(
        &self,
        agent_id: &str,
        field: AgentToggleField,
    ) -> Result<bool, GatewayError> {
        let new_value = {
            let mut agents = self.agents.write().await;
            let agent = agents
                .iter_mut()
                .find(|a| a.id == agent_id)
                .ok_or_else(|| GatewayError::new(format!("unknown agent {agent_id}")))?;
            match field {
                AgentToggleField::AutoSwitch => {
                    agent.auto_switch_enabled = !agent.auto_switch_enabled;
                    agent.auto_switch_enabled
                }
                AgentToggleField::AutoTerminate => {
                    agent.auto_terminate_enabled = !agent.auto_terminate_enabled;
                    agent.auto_terminate_enabled
                }
            }
        };

        match self
            .gateway
            .update_agent_settings(agent_id, &field.patch(new_value))
            .await
        {
            Ok(()) => {
                info!(
                    event = "agent_setting_updated",
                    agent_id = %agent_id,
                    field = field.name(),
                    value = new_value,
                    "Agent setting updated"
                );
                Ok(new_value)
            }
            Err(err) => {
                warn!(
                    event = "agent_setting_rejected",
                    agent_id = %agent_id,
                    field = field.name(),
                    error = %err,
                    "Settings write failed, reconciling from backend"
                );
                if let Err(reload_err) = self.reload().await {
                    warn!(
                        event = "agent_reconcile_failed",
                        agent_id = %agent_id,
                        error = %reload_err,
                        "Reconciliation reload failed"
                    );
                }
                Err(err)
            }
        }
    }

    /// Enable or disable an agent: plain write followed by a full reload.
    pub async fn set_enabled(&self, agent_id: &str, enabled: bool) -> Result<(), GatewayError> {
        self.gateway.toggle_agent_enabled(agent_id, enabled).await?;
        info!(
            event = "agent_enabled_changed",
            agent_id = %agent_id,
            enabled,
            "Agent enabled flag changed"
        );
        self.reload().await?;
        Ok(())
    }

    /// Write decision thresholds for an agent.
    pub async fn update_config(
        &self,
        agent_id: &str,
        config: &AgentConfig,
    ) -> Result<(), GatewayError> {
        self.gateway.update_agent_config(agent_id, config).await?;
        info!(
            event = "agent_config_updated",
            agent_id = %agent_id,
            schema_version = config.schema_version,
            "Agent configuration updated"
        );
        Ok(())
    }
}
