//! Recurring refresh primitive
//!
//! Drives live-ish dashboard views: invokes the refresh action immediately
//! and then on a fixed cadence until stopped. The task is explicitly
//! cancellable; dropping the handle aborts it, so no ticks outlive the
//! consuming view.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::debug;

/// Handle to a running recurring-refresh task.
pub struct PollingRefresher {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl PollingRefresher {
    /// Spawn the refresh loop. The first invocation fires immediately.
    ///
    /// Each tick awaits the action to completion before the next tick is
    /// honored; consumers apply their own staleness check before using a
    /// tick's results.
    pub fn spawn<A, Fut>(period: Duration, mut action: A) -> Self
    where
        A: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => action().await,
                    _ = shutdown_rx.changed() => {
                        debug!(event = "refresh_stopped", "Stopping refresh loop");
                        break;
                    }
                }
            }
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signal shutdown and wait for the loop to finish its current tick.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for PollingRefresher {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
