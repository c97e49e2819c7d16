//! Detail load orchestration
//!
//! One `open` call is one load cycle. The three primary reads are joined
//! concurrently and must all succeed; the history read runs strictly after
//! the join and degrades to an empty series on failure. Every state write
//! re-checks the cycle's generation inside the write-lock critical section,
//! so results from a superseded cycle can never overwrite fresher state
//! regardless of network response ordering.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{DetailState, InstanceDetail};
use crate::error::ConsoleError;
use crate::gateway::{BackendGateway, HistoryBucket};
use crate::models::PriceHistoryPoint;
use crate::ranker;

/// Configuration for the detail load cycle.
#[derive(Debug, Clone)]
pub struct DetailConfig {
    /// Price-history lookback window in days.
    pub history_lookback_days: u32,
    /// Price-history bucket interval.
    pub history_bucket: HistoryBucket,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            history_lookback_days: 7,
            history_bucket: HistoryBucket::Hour,
        }
    }
}

/// Coordinates the multi-source fetch for one inspected instance.
pub struct DetailOrchestrator {
    gateway: Arc<dyn BackendGateway>,
    config: DetailConfig,
    state: RwLock<DetailState>,
    generation: AtomicU64,
}

impl DetailOrchestrator {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self::with_config(gateway, DetailConfig::default())
    }

    pub fn with_config(gateway: Arc<dyn BackendGateway>, config: DetailConfig) -> Self {
        Self {
            gateway,
            config,
            state: RwLock::new(DetailState::Idle),
            generation: AtomicU64::new(0),
        }
    }

    /// Current state snapshot for rendering.
    pub async fn state(&self) -> DetailState {
        self.state.read().await.clone()
    }

    /// Begin a load cycle for `instance_id` and drive it to completion.
    ///
    /// Returns the state as of this cycle's end, which reflects a newer
    /// cycle if this one was superseded while in flight.
    pub async fn open(&self, instance_id: &str) -> DetailState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.apply(
            generation,
            DetailState::Loading {
                instance_id: instance_id.to_string(),
            },
        )
        .await;

        let (pricing, metrics, options) = tokio::join!(
            self.gateway.pricing(instance_id),
            self.gateway.metrics(instance_id),
            self.gateway.available_options(instance_id),
        );

        let state = match (pricing, metrics, options) {
            (Ok(pricing), Ok(metrics), Ok(options)) => match ranker::rank(&pricing) {
                Ok(ranked) => {
                    if !self.is_current(generation) {
                        // Superseded mid-cycle; skip the history read, the
                        // result would be dropped anyway.
                        return self.state().await;
                    }
                    let (history, history_degraded) = self.load_history(instance_id).await;
                    DetailState::Ready(Box::new(InstanceDetail {
                        instance_id: instance_id.to_string(),
                        pricing,
                        ranked,
                        metrics,
                        options,
                        history,
                        history_degraded,
                    }))
                }
                Err(err) => DetailState::Error {
                    instance_id: instance_id.to_string(),
                    message: ConsoleError::DataQuality(err).to_string(),
                },
            },
            (pricing, metrics, options) => {
                let message = pricing
                    .err()
                    .or(metrics.err())
                    .or(options.err())
                    .map(|e| e.message().to_string())
                    .unwrap_or_else(|| "unknown load failure".to_string());
                DetailState::Error {
                    instance_id: instance_id.to_string(),
                    message: ConsoleError::LoadFailed(message).to_string(),
                }
            }
        };

        self.apply(generation, state).await;
        self.state().await
    }

    /// End the inspection. Idempotent; in-flight results from any prior
    /// cycle are discarded by the generation bump.
    pub async fn close(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        *state = DetailState::Idle;
    }

    /// Isolated history read: failure degrades to an empty series instead of
    /// failing the cycle.
    async fn load_history(&self, instance_id: &str) -> (Vec<PriceHistoryPoint>, bool) {
        match self
            .gateway
            .price_history(
                instance_id,
                self.config.history_lookback_days,
                self.config.history_bucket,
            )
            .await
        {
            Ok(points) => (points, false),
            Err(err) => {
                warn!(
                    event = "price_history_unavailable",
                    instance_id = %instance_id,
                    error = %err,
                    "Price history read failed, rendering empty series"
                );
                (Vec::new(), true)
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Apply a state transition iff the cycle is still current. The check
    /// runs inside the write-lock critical section so a newer cycle cannot
    /// race past it.
    async fn apply(&self, generation: u64, state: DetailState) -> bool {
        let mut guard = self.state.write().await;
        if !self.is_current(generation) {
            debug!(
                event = "stale_result_discarded",
                generation,
                "Discarding result from superseded load cycle"
            );
            return false;
        }
        *guard = state;
        true
    }
}
