//! Instance inspection
//!
//! The detail orchestrator coordinates the multi-source fetch behind the
//! inspection view: a three-way join over pricing, metrics, and available
//! options, followed by an isolated price-history read. Superseded loads
//! are discarded via a monotonic generation counter.

mod orchestrator;

pub use orchestrator::{DetailConfig, DetailOrchestrator};

use serde::Serialize;

use crate::models::{
    AvailableOptions, MetricsSnapshot, PriceHistoryPoint, PricingSnapshot,
};
use crate::ranker::RankedPool;

/// State machine of one inspection: `Idle -> Loading -> {Ready, Error}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DetailState {
    Idle,
    Loading {
        instance_id: String,
    },
    Ready(Box<InstanceDetail>),
    Error {
        instance_id: String,
        message: String,
    },
}

impl DetailState {
    pub fn is_ready(&self) -> bool {
        matches!(self, DetailState::Ready(_))
    }

    /// Instance the state refers to, if any.
    pub fn instance_id(&self) -> Option<&str> {
        match self {
            DetailState::Idle => None,
            DetailState::Loading { instance_id }
            | DetailState::Error { instance_id, .. } => Some(instance_id),
            DetailState::Ready(detail) => Some(&detail.instance_id),
        }
    }
}

/// Fully-loaded inspection snapshot for one instance.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceDetail {
    pub instance_id: String,
    pub pricing: PricingSnapshot,
    /// Pools annotated by the ranker, best price first.
    pub ranked: Vec<RankedPool>,
    pub metrics: MetricsSnapshot,
    pub options: AvailableOptions,
    /// Price-history series; empty when none was recorded or the read
    /// degraded.
    pub history: Vec<PriceHistoryPoint>,
    /// True when the history read failed and the series fell back to empty.
    /// The view renders "unavailable" instead of "none recorded".
    pub history_degraded: bool,
}
