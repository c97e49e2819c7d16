//! Error taxonomy for the orchestration core

use thiserror::Error;

use crate::ranker::RankError;

/// Failure reported by the backend gateway.
///
/// The orchestration layer treats gateway failures as opaque beyond the
/// human-readable message, so this intentionally carries nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GatewayError {
    message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failures surfaced by the orchestrator and dispatcher. Every variant maps
/// to a user-visible message; none propagate past the component boundary as
/// unhandled faults.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// One of the joined detail reads failed; the whole load cycle fails and
    /// no partial data is rendered.
    #[error("failed to load instance details: {0}")]
    LoadFailed(String),

    /// Backend pricing data is internally inconsistent.
    #[error("pricing data rejected: {0}")]
    DataQuality(#[from] RankError),

    /// A command for the same (instance, target) pair is already outstanding.
    #[error("a switch to {target_label} is already in flight for instance {instance_id}")]
    Conflict {
        instance_id: String,
        target_label: String,
    },

    /// The mutating call was rejected by the backend.
    #[error("switch command rejected: {message}. Check that the managing agent is online and retry.")]
    CommandRejected { message: String },

    /// The operator declined the confirmation prompt.
    #[error("switch not confirmed")]
    ConfirmationDeclined,

    /// The command failed client-side validation before any network call.
    #[error("invalid switch command: {0}")]
    InvalidCommand(String),
}
