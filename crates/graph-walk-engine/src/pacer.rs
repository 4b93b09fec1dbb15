//! Inter-step pacing with cancellation and early wake-up.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::error::{TraversalError, TraversalResult};

/// Sleeps between steps of one run.
///
/// A pause ends in one of three ways: the delay elapses (`Ok`), the run is
/// cancelled (`Cancelled`), or someone nudges it (`Interrupted`).
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
    cancel: CancellationToken,
    nudge: Arc<Notify>,
}

impl Pacer {
    pub fn new(delay: Duration, cancel: CancellationToken, nudge: Arc<Notify>) -> Self {
        Self {
            delay,
            cancel,
            nudge,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the delay.
    pub async fn pause(&self) -> TraversalResult<()> {
        if self.cancel.is_cancelled() {
            return Err(TraversalError::Cancelled);
        }

        if self.delay.is_zero() {
            // Still give the runtime a chance to deliver a cancel.
            tokio::task::yield_now().await;
            return if self.cancel.is_cancelled() {
                Err(TraversalError::Cancelled)
            } else {
                Ok(())
            };
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(TraversalError::Cancelled),
            _ = self.nudge.notified() => Err(TraversalError::Interrupted),
            _ = tokio::time::sleep(self.delay) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pacer(delay_ms: u64) -> (Pacer, CancellationToken, Arc<Notify>) {
        let cancel = CancellationToken::new();
        let nudge = Arc::new(Notify::new());
        let pacer = Pacer::new(
            Duration::from_millis(delay_ms),
            cancel.clone(),
            Arc::clone(&nudge),
        );
        (pacer, cancel, nudge)
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_waits_for_delay() {
        let (pacer, _, _) = pacer(500);
        let started = tokio::time::Instant::now();
        pacer.pause().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_nudge_interrupts_pause() {
        let (pacer, _, nudge) = pacer(10_000);
        nudge.notify_one();
        let started = tokio::time::Instant::now();
        assert!(matches!(pacer.pause().await, Err(TraversalError::Interrupted)));
        assert!(started.elapsed() < Duration::from_millis(10_000));
    }

    #[tokio::test]
    async fn test_cancel_wins() {
        let (pacer, cancel, nudge) = pacer(10_000);
        nudge.notify_one();
        cancel.cancel();
        assert!(matches!(pacer.pause().await, Err(TraversalError::Cancelled)));
    }

    #[tokio::test]
    async fn test_zero_delay_does_not_sleep() {
        let (pacer, _, _) = pacer(0);
        pacer.pause().await.unwrap();
    }
}
