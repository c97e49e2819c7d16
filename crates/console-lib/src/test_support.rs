//! Shared test doubles
//!
//! A scripted [`BackendGateway`] whose per-call gates let tests control
//! resolution order deterministically, plus canned confirmation providers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::{Mutex, Notify};

use crate::dispatch::ConfirmationProvider;
use crate::error::GatewayError;
use crate::gateway::{BackendGateway, HistoryBucket};
use crate::models::{
    Agent, AgentConfig, AgentSettingsPatch, AgentStatus, AvailableOptions, DecisionFeed, Instance,
    MetricsSnapshot, OnDemandPricing, Pool, PriceHistoryPoint, PricingSnapshot, SwitchAck,
    SwitchCommand, SystemHealth,
};

pub(crate) fn test_pricing() -> PricingSnapshot {
    PricingSnapshot {
        on_demand: OnDemandPricing { price: 1.00 },
        pools: vec![
            Pool {
                id: "p1".to_string(),
                price: 0.30,
                savings: 70.0,
            },
            Pool {
                id: "p2".to_string(),
                price: 0.45,
                savings: 55.0,
            },
        ],
    }
}

pub(crate) fn test_metrics() -> MetricsSnapshot {
    MetricsSnapshot {
        uptime_hours: 120.5,
        total_switches: 14,
        switches_last_7_days: 3,
        total_savings: 412.77,
        savings_last_30_days: 98.10,
        spot_price: 0.30,
        on_demand_price: 1.00,
    }
}

pub(crate) fn test_options() -> AvailableOptions {
    AvailableOptions {
        pools: test_pricing().pools,
        instance_types: vec!["m5.large".to_string(), "m5.xlarge".to_string()],
        current_instance_type: Some("m5.large".to_string()),
    }
}

pub(crate) fn test_history() -> Vec<PriceHistoryPoint> {
    vec![
        PriceHistoryPoint {
            time: "11-18 09:00".to_string(),
            avg_price: 0.31,
            min_price: 0.28,
            max_price: 0.35,
        },
        PriceHistoryPoint {
            time: "11-18 10:00".to_string(),
            avg_price: 0.32,
            min_price: 0.29,
            max_price: 0.36,
        },
    ]
}

pub(crate) fn test_agent(id: &str) -> Agent {
    Agent {
        id: id.to_string(),
        status: AgentStatus::Online,
        last_heartbeat: Some(Utc.with_ymd_and_hms(2025, 11, 19, 10, 0, 0).unwrap()),
        instance_count: 2,
        enabled: true,
        auto_switch_enabled: true,
        auto_terminate_enabled: true,
    }
}

pub(crate) struct AlwaysConfirm;

#[async_trait]
impl ConfirmationProvider for AlwaysConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

pub(crate) struct NeverConfirm;

#[async_trait]
impl ConfirmationProvider for NeverConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// Scripted gateway. Reads resolve from seeded per-instance data; `hold`
/// installs a gate that blocks the named call until the returned notify is
/// signaled, letting tests interleave cycles deterministically.
pub(crate) struct MockGateway {
    pricing: Mutex<HashMap<String, Result<PricingSnapshot, String>>>,
    metrics: Mutex<HashMap<String, Result<MetricsSnapshot, String>>>,
    options: Mutex<HashMap<String, Result<AvailableOptions, String>>>,
    history: Mutex<HashMap<String, Result<Vec<PriceHistoryPoint>, String>>>,
    agents: Mutex<Vec<Agent>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    force_switch_calls: Mutex<Vec<(String, SwitchCommand)>>,
    force_switch_failure: Mutex<Option<String>>,
    settings_calls: Mutex<Vec<(String, AgentSettingsPatch)>>,
    settings_failure: Mutex<Option<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            pricing: Mutex::new(HashMap::new()),
            metrics: Mutex::new(HashMap::new()),
            options: Mutex::new(HashMap::new()),
            history: Mutex::new(HashMap::new()),
            agents: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
            force_switch_calls: Mutex::new(Vec::new()),
            force_switch_failure: Mutex::new(None),
            settings_calls: Mutex::new(Vec::new()),
            settings_failure: Mutex::new(None),
        }
    }

    /// Seed canonical detail data for one instance.
    pub async fn seed_instance(&self, instance_id: &str) {
        self.pricing
            .lock()
            .await
            .insert(instance_id.to_string(), Ok(test_pricing()));
        self.metrics
            .lock()
            .await
            .insert(instance_id.to_string(), Ok(test_metrics()));
        self.options
            .lock()
            .await
            .insert(instance_id.to_string(), Ok(test_options()));
        self.history
            .lock()
            .await
            .insert(instance_id.to_string(), Ok(test_history()));
    }

    pub async fn set_pricing(&self, instance_id: &str, pricing: PricingSnapshot) {
        self.pricing
            .lock()
            .await
            .insert(instance_id.to_string(), Ok(pricing));
    }

    pub async fn set_history(&self, instance_id: &str, history: Vec<PriceHistoryPoint>) {
        self.history
            .lock()
            .await
            .insert(instance_id.to_string(), Ok(history));
    }

    pub async fn set_agents(&self, agents: Vec<Agent>) {
        *self.agents.lock().await = agents;
    }

    pub async fn fail_metrics(&self, instance_id: &str, message: &str) {
        self.metrics
            .lock()
            .await
            .insert(instance_id.to_string(), Err(message.to_string()));
    }

    pub async fn fail_history(&self, instance_id: &str, message: &str) {
        self.history
            .lock()
            .await
            .insert(instance_id.to_string(), Err(message.to_string()));
    }

    pub async fn fail_force_switch(&self, message: &str) {
        *self.force_switch_failure.lock().await = Some(message.to_string());
    }

    pub async fn clear_force_switch_failure(&self) {
        *self.force_switch_failure.lock().await = None;
    }

    pub async fn fail_settings(&self, message: &str) {
        *self.settings_failure.lock().await = Some(message.to_string());
    }

    /// Block the next pass through `method` for `instance_id` until the
    /// returned notify fires. The gate clears itself after one pass.
    pub async fn hold(&self, method: &str, instance_id: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .await
            .insert(format!("{method}:{instance_id}"), notify.clone());
        notify
    }

    pub async fn force_switch_calls(&self) -> Vec<(String, SwitchCommand)> {
        self.force_switch_calls.lock().await.clone()
    }

    pub async fn settings_calls(&self) -> Vec<(String, AgentSettingsPatch)> {
        self.settings_calls.lock().await.clone()
    }

    async fn gate(&self, method: &str, instance_id: &str) {
        let key = format!("{method}:{instance_id}");
        let notify = { self.gates.lock().await.get(&key).cloned() };
        if let Some(notify) = notify {
            notify.notified().await;
            self.gates.lock().await.remove(&key);
        }
    }

    async fn scripted<T: Clone>(
        map: &Mutex<HashMap<String, Result<T, String>>>,
        instance_id: &str,
        endpoint: &str,
    ) -> Result<T, GatewayError> {
        map.lock()
            .await
            .get(instance_id)
            .cloned()
            .unwrap_or_else(|| Err(format!("no scripted {endpoint} for {instance_id}")))
            .map_err(GatewayError::new)
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    async fn pricing(&self, instance_id: &str) -> Result<PricingSnapshot, GatewayError> {
        self.gate("pricing", instance_id).await;
        Self::scripted(&self.pricing, instance_id, "pricing").await
    }

    async fn metrics(&self, instance_id: &str) -> Result<MetricsSnapshot, GatewayError> {
        self.gate("metrics", instance_id).await;
        Self::scripted(&self.metrics, instance_id, "metrics").await
    }

    async fn available_options(
        &self,
        instance_id: &str,
    ) -> Result<AvailableOptions, GatewayError> {
        self.gate("options", instance_id).await;
        Self::scripted(&self.options, instance_id, "options").await
    }

    async fn price_history(
        &self,
        instance_id: &str,
        _lookback_days: u32,
        _bucket: HistoryBucket,
    ) -> Result<Vec<PriceHistoryPoint>, GatewayError> {
        self.gate("history", instance_id).await;
        Self::scripted(&self.history, instance_id, "history").await
    }

    async fn force_switch(
        &self,
        instance_id: &str,
        command: &SwitchCommand,
    ) -> Result<SwitchAck, GatewayError> {
        self.gate("force_switch", instance_id).await;
        self.force_switch_calls
            .lock()
            .await
            .push((instance_id.to_string(), command.clone()));
        if let Some(message) = self.force_switch_failure.lock().await.clone() {
            return Err(GatewayError::new(message));
        }
        Ok(SwitchAck {
            message: Some("queued".to_string()),
        })
    }

    async fn instances(&self, _client_id: &str) -> Result<Vec<Instance>, GatewayError> {
        Ok(Vec::new())
    }

    async fn agents(&self, _client_id: &str) -> Result<Vec<Agent>, GatewayError> {
        Ok(self.agents.lock().await.clone())
    }

    async fn toggle_agent_enabled(
        &self,
        agent_id: &str,
        enabled: bool,
    ) -> Result<(), GatewayError> {
        let mut agents = self.agents.lock().await;
        let agent = agents
            .iter_mut()
            .find(|a| a.id == agent_id)
            .ok_or_else(|| GatewayError::new(format!("unknown agent {agent_id}")))?;
        agent.enabled = enabled;
        Ok(())
    }

    async fn update_agent_settings(
        &self,
        agent_id: &str,
        patch: &AgentSettingsPatch,
    ) -> Result<(), GatewayError> {
        self.settings_calls
            .lock()
            .await
            .push((agent_id.to_string(), patch.clone()));
        if let Some(message) = self.settings_failure.lock().await.clone() {
            return Err(GatewayError::new(message));
        }
        let mut agents = self.agents.lock().await;
        let agent = agents
            .iter_mut()
            .find(|a| a.id == agent_id)
            .ok_or_else(|| GatewayError::new(format!("unknown agent {agent_id}")))?;
        if let Some(value) = patch.auto_switch_enabled {
            agent.auto_switch_enabled = value;
        }
        if let Some(value) = patch.auto_terminate_enabled {
            agent.auto_terminate_enabled = value;
        }
        Ok(())
    }

    async fn update_agent_config(
        &self,
        _agent_id: &str,
        _config: &AgentConfig,
    ) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn agent_decisions(&self, _client_id: &str) -> Result<DecisionFeed, GatewayError> {
        Ok(DecisionFeed::default())
    }

    async fn system_health(&self) -> Result<SystemHealth, GatewayError> {
        Ok(SystemHealth::default())
    }
}
