use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::broadcast;

/// Process-wide pause flag plus a broadcast of "sleep `d` seconds" signals.
///
/// Modelled on the atomic test-and-set pattern this workspace uses for
/// circuit breakers: `paused` is a single `AtomicBool` read from every
/// worker's hot loop, and the broadcast channel fans the same signal out to
/// every subscriber — `tokio::sync::broadcast::Sender::send` already
/// delivers one copy per subscribed receiver, so a single `send` satisfies
/// "enqueue `d` once per worker" without an explicit loop.
pub struct PauseController {
    paused: AtomicBool,
    tx: broadcast::Sender<u64>,
}

impl PauseController {
    pub fn new(worker_count: usize) -> Self {
        let (tx, _) = broadcast::channel(worker_count.max(1));
        Self {
            paused: AtomicBool::new(false),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<u64> {
        self.tx.subscribe()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Called by any worker that receives `RateLimited { retry_after_seconds: d }`.
    pub fn observe_rate_limit(&self, retry_after_seconds: u64) {
        // No receivers (e.g. in a unit test without a subscriber) is not an error.
        let _ = self.tx.send(retry_after_seconds);
    }

    /// Runs the pause sequence for one received broadcast: if another worker
    /// already won the race to pause, this is a no-op. Otherwise this call
    /// becomes responsible for flipping `paused` back to `false` after the
    /// sleep, via a detached task that never blocks the caller.
    pub fn begin_pause(self: &Arc<Self>, retry_after_seconds: u64) {
        if self.paused.swap(true, Ordering::AcqRel) {
            return;
        }
        metrics::gauge!("pipeline_paused").set(1.0);

        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(retry_after_seconds)).await;
            this.paused.store(false, Ordering::Release);
            metrics::gauge!("pipeline_paused").set(0.0);
        });
    }
}

/// Waits for the next pause broadcast, skipping over lagged deliveries (a
/// worker that was busy through several broadcasts just resumes from the
/// newest one — re-pausing for a value that's already stale is harmless).
pub async fn recv_pause_signal(rx: &mut broadcast::Receiver<u64>) -> Option<u64> {
    loop {
        match rx.recv().await {
            Ok(d) => return Some(d),
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_delivers_to_every_subscriber() {
        let controller = Arc::new(PauseController::new(3));
        let mut rxs: Vec<_> = (0..3).map(|_| controller.subscribe()).collect();

        controller.observe_rate_limit(5);

        for rx in &mut rxs {
            assert_eq!(recv_pause_signal(rx).await, Some(5));
        }
    }

    #[tokio::test]
    async fn second_pause_signal_is_ignored_while_already_paused() {
        let controller = Arc::new(PauseController::new(2));

        controller.begin_pause(60);
        assert!(controller.is_paused());

        // A second worker's call observes paused already true and is a
        // no-op: this asserts it doesn't panic or double-flip the flag.
        controller.begin_pause(60);
        assert!(controller.is_paused());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_clears_after_the_sleep_elapses() {
        let controller = Arc::new(PauseController::new(1));

        controller.begin_pause(10);
        assert!(controller.is_paused());

        tokio::time::advance(Duration::from_secs(11)).await;
        tokio::task::yield_now().await;

        assert!(!controller.is_paused());
    }
}
