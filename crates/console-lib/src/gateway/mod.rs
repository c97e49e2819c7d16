//! Backend gateway contract
//!
//! The trait is the only seam between the orchestration core and the
//! backend. Mutating calls are idempotent-unsafe: nothing here retries
//! automatically.

mod http;

pub use http::{HttpGateway, HttpGatewayBuilder};

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::models::{
    Agent, AgentConfig, AgentSettingsPatch, AvailableOptions, DecisionFeed, Instance,
    MetricsSnapshot, PriceHistoryPoint, PricingSnapshot, SwitchAck, SwitchCommand, SystemHealth,
};

/// Bucket interval for the price-history read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBucket {
    Hour,
    Day,
}

impl HistoryBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryBucket::Hour => "hour",
            HistoryBucket::Day => "day",
        }
    }
}

/// Read and write endpoints exposed by the backend.
///
/// All failures carry a human-readable message; callers never inspect
/// beyond it.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn pricing(&self, instance_id: &str) -> Result<PricingSnapshot, GatewayError>;

    async fn metrics(&self, instance_id: &str) -> Result<MetricsSnapshot, GatewayError>;

    async fn available_options(&self, instance_id: &str)
        -> Result<AvailableOptions, GatewayError>;

    /// May return an empty series; that is a legitimate response, not an
    /// error.
    async fn price_history(
        &self,
        instance_id: &str,
        lookback_days: u32,
        bucket: HistoryBucket,
    ) -> Result<Vec<PriceHistoryPoint>, GatewayError>;

    /// Fire-and-queue: success means the command was accepted for the
    /// managing agent, not that the switch has happened.
    async fn force_switch(
        &self,
        instance_id: &str,
        command: &SwitchCommand,
    ) -> Result<SwitchAck, GatewayError>;

    async fn instances(&self, client_id: &str) -> Result<Vec<Instance>, GatewayError>;

    async fn agents(&self, client_id: &str) -> Result<Vec<Agent>, GatewayError>;

    async fn toggle_agent_enabled(
        &self,
        agent_id: &str,
        enabled: bool,
    ) -> Result<(), GatewayError>;

    async fn update_agent_settings(
        &self,
        agent_id: &str,
        patch: &AgentSettingsPatch,
    ) -> Result<(), GatewayError>;

    async fn update_agent_config(
        &self,
        agent_id: &str,
        config: &AgentConfig,
    ) -> Result<(), GatewayError>;

    async fn agent_decisions(&self, client_id: &str) -> Result<DecisionFeed, GatewayError>;

    async fn system_health(&self) -> Result<SystemHealth, GatewayError>;
}
