use std::sync::Arc;
use std::time::Duration;

use domain_orders::OrderRepository;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;

use crate::client::AccrualClient;
use crate::pause::PauseController;
use crate::scanner::Scanner;
use crate::worker::Worker;

/// Starts the worker pool and scanner, and owns the shutdown handshake.
///
/// On `shutdown`: flips the watch channel once (a close-once broadcast by
/// construction — `watch::Sender::send` is idempotent to call again but we
/// only ever call it from one place), awaits every worker's `JoinHandle`,
/// then closes the dispatch channel by dropping its sender. Closing
/// dispatch before the workers exit would race their receives, so the order
/// here is significant.
pub struct Supervisor {
    shutdown_tx: watch::Sender<bool>,
    dispatch_tx: Option<mpsc::Sender<String>>,
    handles: Vec<JoinHandle<()>>,
}

impl Supervisor {
    /// Spawns `worker_count` workers and one scanner task against `repository`,
    /// dispatching through a channel sized to `worker_count`.
    pub fn spawn<R: OrderRepository + 'static>(
        repository: Arc<R>,
        client: AccrualClient,
        worker_count: usize,
        scan_interval: Duration,
    ) -> Self {
        let worker_count = worker_count.max(1);
        let (dispatch_tx, dispatch_rx) = mpsc::channel::<String>(worker_count);
        let dispatch_rx = Arc::new(Mutex::new(dispatch_rx));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let pause = Arc::new(PauseController::new(worker_count));

        let mut handles = Vec::with_capacity(worker_count + 1);

        for id in 0..worker_count {
            let worker = Worker::new(
                id,
                Arc::clone(&dispatch_rx),
                Arc::clone(&pause),
                client.clone(),
                Arc::clone(&repository),
            );
            let shutdown_rx = shutdown_rx.clone();
            handles.push(tokio::spawn(worker.run(shutdown_rx)));
        }

        let scanner = Scanner::new(Arc::clone(&repository), dispatch_tx.clone(), scan_interval);
        handles.push(tokio::spawn(scanner.run(shutdown_rx)));

        tracing::info!(worker_count, scan_interval_secs = scan_interval.as_secs(), "accrual pipeline started");

        Self {
            shutdown_tx,
            dispatch_tx: Some(dispatch_tx),
            handles,
        }
    }

    /// Signals shutdown and waits for every worker and the scanner to exit.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);

        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "pipeline task panicked");
            }
        }

        // Drop the last sender only after every consumer has exited.
        self.dispatch_tx.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_orders::InMemoryOrderRepository;

    #[tokio::test]
    async fn spawn_then_immediate_shutdown_drains_cleanly() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let client = AccrualClient::new("http://localhost:0").unwrap();

        let supervisor = Supervisor::spawn(repo, client, 2, Duration::from_millis(10));
        supervisor.shutdown().await;
    }
}
