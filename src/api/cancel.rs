// file: src/api/cancel.rs
// description: abort handle shared by a workflow and every request it issues
// reference: https://docs.rs/tokio/latest/tokio/sync/watch/index.html

use crate::error::{ArchiveError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable; cancelling any clone cancels them all. Cancellation is permanent.
#[derive(Debug, Clone)]
pub struct CancelToken {
    state: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Runs `request` unless the token fires first, in which case the request
    /// future is dropped and `ArchiveError::Cancelled` is returned.
    pub async fn guard<T, F>(&self, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(ArchiveError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(ArchiveError::Cancelled),
            result = request => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_guard_passes_result_through() {
        let token = CancelToken::new();
        let value = token.guard(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_guard_refuses_after_cancel() {
        let token = CancelToken::new();
        token.clone().cancel();
        assert!(token.is_cancelled());

        let result: Result<()> = token.guard(async { Ok(()) }).await;
        assert!(result.unwrap_err().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_pending_request() {
        let token = CancelToken::new();
        let remote = token.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            remote.cancel();
        });

        let result: Result<()> = token
            .guard(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(ArchiveError::Cancelled)));
    }

    #[test]
    fn test_cancelled_wakes_waiter() {
        let token = CancelToken::new();
        let mut waiter = tokio_test::task::spawn(token.cancelled());
        tokio_test::assert_pending!(waiter.poll());

        token.cancel();
        assert!(waiter.is_woken());
        tokio_test::assert_ready!(waiter.poll());
    }
}
