//! Core data models for the switch-orchestration layer
//!
//! Field renames mirror the backend wire format exactly: read endpoints use
//! camelCase, the force-switch body and agent settings use snake_case, and
//! agent records mix both. The client follows the backend rather than
//! papering over it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A compute instance's placement snapshot as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    #[serde(rename = "az")]
    pub availability_zone: String,
    pub mode: InstanceMode,
    #[serde(rename = "poolId", default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
    #[serde(rename = "spotPrice")]
    pub spot_price: f64,
    #[serde(rename = "onDemandPrice")]
    pub on_demand_price: f64,
    #[serde(rename = "lastSwitch", default, skip_serializing_if = "Option::is_none")]
    pub last_switch: Option<DateTime<Utc>>,
}

/// Current placement tier of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceMode {
    #[serde(rename = "spot")]
    Spot,
    #[serde(rename = "ondemand")]
    OnDemand,
}

/// Pricing read for one instance: the on-demand fallback plus the candidate
/// spot pools, pre-ranked price-ascending by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSnapshot {
    #[serde(rename = "onDemand")]
    pub on_demand: OnDemandPricing,
    pub pools: Vec<Pool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnDemandPricing {
    pub price: f64,
}

/// A discounted capacity pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    pub price: f64,
    /// Savings percent relative to on-demand, as reported by the backend.
    pub savings: f64,
}

/// Historical metrics for one instance, refreshed per inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub uptime_hours: f64,
    pub total_switches: u64,
    #[serde(rename = "switchesLast7Days")]
    pub switches_last_7_days: u64,
    pub total_savings: f64,
    #[serde(rename = "savingsLast30Days", default)]
    pub savings_last_30_days: f64,
    pub spot_price: f64,
    pub on_demand_price: f64,
}

/// Candidate placements for the advanced-switch form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableOptions {
    #[serde(default)]
    pub pools: Vec<Pool>,
    #[serde(default)]
    pub instance_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_instance_type: Option<String>,
}

/// One bucket of the price-history series. The series is ordered by the
/// backend and may legitimately be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryPoint {
    pub time: String,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

/// Placement a force-switch command moves an instance to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchTarget {
    Pool { pool_id: String },
    OnDemand,
}

/// Marker used as the in-flight key for the on-demand target. Mirrors the
/// literal the backend accepts in the force-switch body.
pub const ON_DEMAND_TARGET_KEY: &str = "ondemand";

impl SwitchTarget {
    /// Key identifying this target for in-flight de-duplication.
    pub fn key(&self) -> &str {
        match self {
            SwitchTarget::Pool { pool_id } => pool_id,
            SwitchTarget::OnDemand => ON_DEMAND_TARGET_KEY,
        }
    }

    /// Human-readable label used in confirmation prompts and notifications.
    pub fn label(&self) -> String {
        match self {
            SwitchTarget::Pool { pool_id } => format!("Pool {pool_id}"),
            SwitchTarget::OnDemand => "On-Demand".to_string(),
        }
    }
}

/// An operator-initiated switch command, constructed client-side and
/// validated before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchCommand {
    pub target: SwitchTarget,
    /// Optional instance-type override applied as part of the switch.
    pub instance_type: Option<String>,
}

impl SwitchCommand {
    pub fn to_pool(pool_id: impl Into<String>) -> Self {
        Self {
            target: SwitchTarget::Pool {
                pool_id: pool_id.into(),
            },
            instance_type: None,
        }
    }

    pub fn to_on_demand() -> Self {
        Self {
            target: SwitchTarget::OnDemand,
            instance_type: None,
        }
    }

    pub fn with_instance_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type = Some(instance_type.into());
        self
    }

    pub fn target_key(&self) -> &str {
        self.target.key()
    }

    pub fn target_label(&self) -> String {
        self.target.label()
    }
}

impl Serialize for SwitchCommand {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Wire body: { target, pool_id?, instance_type? }
        #[derive(Serialize)]
        struct Body<'a> {
            target: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            pool_id: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            instance_type: Option<&'a str>,
        }

        let (target, pool_id) = match &self.target {
            SwitchTarget::Pool { pool_id } => ("pool", Some(pool_id.as_str())),
            SwitchTarget::OnDemand => (ON_DEMAND_TARGET_KEY, None),
        };

        Body {
            target,
            pool_id,
            instance_type: self.instance_type.as_deref(),
        }
        .serialize(serializer)
    }
}

/// Backend acknowledgement of an accepted force-switch command. Acceptance
/// means queued for the managing agent, not executed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A switching agent registered for a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub status: AgentStatus,
    #[serde(rename = "lastHeartbeat", skip_serializing_if = "Option::is_none")]
    pub last_heartbeat: Option<DateTime<Utc>>,
    #[serde(rename = "instanceCount", default)]
    pub instance_count: u32,
    pub enabled: bool,
    #[serde(default)]
    pub auto_switch_enabled: bool,
    #[serde(default)]
    pub auto_terminate_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Online,
    Offline,
}

/// Partial settings write for an agent. Only the fields present are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentSettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_switch_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_terminate_enabled: Option<bool>,
}

/// Version discriminator carried by every agent config write. The config
/// endpoint's payload shape has changed across backend revisions, so the
/// contract is explicit about which one this client speaks.
pub const AGENT_CONFIG_SCHEMA_VERSION: u32 = 2;

/// Decision thresholds for an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub schema_version: u32,
    pub min_savings_percent: f64,
    pub risk_threshold: f64,
    pub max_switches_per_week: u32,
    pub min_pool_duration_hours: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            schema_version: AGENT_CONFIG_SCHEMA_VERSION,
            min_savings_percent: 15.0,
            risk_threshold: 0.3,
            max_switches_per_week: 10,
            min_pool_duration_hours: 2,
        }
    }
}

/// One append-only audit record of a decision the backend engine made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub timestamp: DateTime<Utc>,
    pub instance_id: String,
    pub decision: DecisionKind,
    /// Model confidence, 0-100.
    #[serde(default)]
    pub confidence: f64,
    /// Instance health score, 0-100.
    #[serde(default)]
    pub health: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub outcome: DecisionOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DecisionKind {
    Switch,
    Hold,
    Terminate,
    /// Labels introduced by newer backend revisions.
    Unknown,
}

impl From<String> for DecisionKind {
    fn from(label: String) -> Self {
        match label.as_str() {
            "switch" => DecisionKind::Switch,
            "hold" => DecisionKind::Hold,
            "terminate" => DecisionKind::Terminate,
            _ => DecisionKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionOutcome {
    Success,
    Failed,
    Pending,
}

/// Decision audit feed plus aggregate stats for the dashboard header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionFeed {
    #[serde(default)]
    pub decisions: Vec<Decision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<DecisionStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionStats {
    #[serde(default)]
    pub total_decisions: u64,
    /// Percent of decisions with a success outcome, 0-100.
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub avg_confidence: f64,
    #[serde(default)]
    pub avg_health: f64,
}

/// Backend system health summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_engine_status: Option<EngineStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_models_status: Option<EngineStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_status: Option<DatabaseStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub loaded: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub engine_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseStatus {
    pub connected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_wire_names() {
        let json = r#"{
            "uptimeHours": 120.5,
            "totalSwitches": 14,
            "switchesLast7Days": 3,
            "totalSavings": 412.77,
            "savingsLast30Days": 98.10,
            "spotPrice": 0.31,
            "onDemandPrice": 1.02
        }"#;

        let metrics: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.total_switches, 14);
        assert_eq!(metrics.switches_last_7_days, 3);
        assert!((metrics.savings_last_30_days - 98.10).abs() < 1e-9);
    }

    #[test]
    fn test_agent_mixed_case_wire() {
        let json = r#"{
            "id": "agent-1",
            "status": "online",
            "lastHeartbeat": "2025-11-19T10:00:00Z",
            "instanceCount": 4,
            "enabled": true,
            "auto_switch_enabled": true,
            "auto_terminate_enabled": false
        }"#;

        let agent: Agent = serde_json::from_str(json).unwrap();
        assert_eq!(agent.status, AgentStatus::Online);
        assert_eq!(agent.instance_count, 4);
        assert!(agent.auto_switch_enabled);
        assert!(!agent.auto_terminate_enabled);
    }

    #[test]
    fn test_switch_command_pool_body() {
        let command = SwitchCommand::to_pool("p1");
        let body = serde_json::to_value(&command).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "target": "pool", "pool_id": "p1" })
        );
    }

    #[test]
    fn test_switch_command_on_demand_with_type_override() {
        let command = SwitchCommand::to_on_demand().with_instance_type("m5.large");
        let body = serde_json::to_value(&command).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "target": "ondemand", "instance_type": "m5.large" })
        );
    }

    #[test]
    fn test_target_keys_and_labels() {
        let pool = SwitchCommand::to_pool("p2");
        assert_eq!(pool.target_key(), "p2");
        assert_eq!(pool.target_label(), "Pool p2");

        let fallback = SwitchCommand::to_on_demand();
        assert_eq!(fallback.target_key(), ON_DEMAND_TARGET_KEY);
        assert_eq!(fallback.target_label(), "On-Demand");
    }

    #[test]
    fn test_decision_kind_is_forward_compatible() {
        let decision: DecisionKind = serde_json::from_str(r#""switch""#).unwrap();
        assert_eq!(decision, DecisionKind::Switch);

        let unknown: DecisionKind = serde_json::from_str(r#""rebalance""#).unwrap();
        assert_eq!(unknown, DecisionKind::Unknown);
    }

    #[test]
    fn test_agent_config_carries_schema_version() {
        let config = AgentConfig::default();
        let body = serde_json::to_value(&config).unwrap();
        assert_eq!(body["schema_version"], AGENT_CONFIG_SCHEMA_VERSION);
        assert_eq!(body["min_savings_percent"], 15.0);
        assert_eq!(body["max_switches_per_week"], 10);
    }

    #[test]
    fn test_settings_patch_sends_only_present_fields() {
        let patch = AgentSettingsPatch {
            auto_switch_enabled: Some(false),
            auto_terminate_enabled: None,
        };
        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body, serde_json::json!({ "auto_switch_enabled": false }));
    }
}
