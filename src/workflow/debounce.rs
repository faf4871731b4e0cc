// file: src/workflow/debounce.rs
// description: per-owner cancelable delay that coalesces bursts of input into one action
// reference: https://docs.rs/tokio/latest/tokio/time/fn.sleep.html

use crate::error::Result;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum DebounceOutcome {
    /// A later `schedule` call (or disposal) cleared the timer before it fired.
    Superseded,
    Completed(Result<()>),
}

impl DebounceOutcome {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

/// Resolves once the scheduled action was either superseded or has run.
/// Dropping the ticket does not affect the action.
#[derive(Debug)]
pub struct DebounceTicket {
    outcome: oneshot::Receiver<DebounceOutcome>,
}

impl DebounceTicket {
    pub async fn outcome(self) -> DebounceOutcome {
        self.outcome.await.unwrap_or(DebounceOutcome::Superseded)
    }
}

/// Owned by one workflow. Only the most recently scheduled action survives the
/// quiet period. Clearing a timer never interrupts an action that already started.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<oneshot::Sender<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, action: F) -> DebounceTicket
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let (clear_tx, clear_rx) = oneshot::channel::<()>();
        let (outcome_tx, outcome_rx) = oneshot::channel();

        if let Some(previous) = self.slot().replace(clear_tx) {
            let _ = previous.send(());
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = clear_rx => {
                    debug!("Debounced action superseded");
                    let _ = outcome_tx.send(DebounceOutcome::Superseded);
                    return;
                }
            }

            let result = action().await;
            if let Err(e) = &result {
                warn!("Debounced action failed: {}", e);
            }
            let _ = outcome_tx.send(DebounceOutcome::Completed(result));
        });

        DebounceTicket {
            outcome: outcome_rx,
        }
    }

    /// Clears the pending timer, if any.
    pub fn cancel(&self) {
        if let Some(pending) = self.slot().take() {
            let _ = pending.send(());
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<oneshot::Sender<()>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
