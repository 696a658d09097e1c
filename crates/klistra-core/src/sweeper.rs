//! Background removal of expired pastes.
//!
//! Reads already refuse expired rows; the sweeper bounds how long their
//! ciphertext stays on disk afterwards.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::{KlistraError, Result};
use crate::storage::PasteStore;

/// Default pause between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest accepted pause; tokio rejects a zero period.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns the periodic sweep task.
pub struct Sweeper;

impl Sweeper {
    /// Start sweeping `store` every `interval` on the current tokio runtime.
    ///
    /// The first sweep runs one full interval after spawning. A failed sweep
    /// is logged and retried on the next tick. Intervals below one
    /// millisecond are raised to one millisecond.
    pub fn spawn(store: Arc<dyn PasteStore>, interval: Duration) -> SweeperHandle {
        let interval = interval.max(MIN_SWEEP_INTERVAL);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // Skip first immediate tick
            ticker.tick().await;

            info!(interval_ms = interval.as_millis() as u64, "sweeper started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let store = Arc::clone(&store);
                        match tokio::task::spawn_blocking(move || store.sweep()).await {
                            Ok(Ok(0)) => debug!("sweep found nothing to remove"),
                            Ok(Ok(removed)) => info!(removed, "swept expired pastes"),
                            Ok(Err(e)) => warn!("sweep failed: {e}"),
                            Err(e) => warn!("sweep task panicked: {e}"),
                        }
                    }
                    _ = &mut stop_rx => break,
                }
            }
            info!("sweeper stopped");
        });

        SweeperHandle { stop_tx, task }
    }
}

/// Owner of a running sweep task.
pub struct SweeperHandle {
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the task to stop and wait for it to finish.
    pub async fn stop(self) -> Result<()> {
        // The task may already be gone; the join below reports that.
        let _ = self.stop_tx.send(());
        self.task
            .await
            .map_err(|e| KlistraError::Storage(format!("Sweeper task failed: {}", e)))
    }

    /// Whether the task has exited, by stopping or by panicking.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
