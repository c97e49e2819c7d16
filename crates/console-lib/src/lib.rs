//! Switch-orchestration core for the Spot Placement Console
//!
//! This crate provides the core functionality for:
//! - Concurrent multi-source loading of an instance's inspection view
//! - Ranking alternative spot-pool placements
//! - Confirmed, de-duplicated force-switch dispatch
//! - Recurring dashboard refresh
//! - Optimistic agent settings synchronization

pub mod agents;
pub mod detail;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod models;
pub mod ranker;
pub mod refresh;

#[cfg(test)]
pub(crate) mod test_support;

pub use agents::{AgentSettingsSync, AgentToggleField};
pub use detail::{DetailConfig, DetailOrchestrator, DetailState, InstanceDetail};
pub use dispatch::{ConfirmationProvider, SwitchCommandDispatcher, SwitchOutcome};
pub use error::{ConsoleError, GatewayError};
pub use gateway::{BackendGateway, HistoryBucket, HttpGateway, HttpGatewayBuilder};
pub use models::*;
pub use ranker::{rank, RankError, RankedPool};
pub use refresh::PollingRefresher;
