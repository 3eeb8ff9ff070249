use std::sync::Arc;
use std::time::Duration;

use domain_orders::OrderRepository;
use tokio::sync::{mpsc, watch};

/// Single-threaded ticker: every `interval`, lists NEW orders and pushes
/// their numbers onto the dispatch channel.
pub struct Scanner<R: OrderRepository> {
    repository: Arc<R>,
    dispatch: mpsc::Sender<String>,
    interval: Duration,
}

impl<R: OrderRepository> Scanner<R> {
    pub fn new(repository: Arc<R>, dispatch: mpsc::Sender<String>, interval: Duration) -> Self {
        Self {
            repository,
            dispatch,
            interval,
        }
    }

    /// Runs until `shutdown` reports `true`. A store error for one tick is
    /// logged and the tick is skipped — the scanner never exits on error.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "scanner started");
        let mut ticker = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("scanner stopping on shutdown signal");
                        return;
                    }
                }

                _ = ticker.tick() => {
                    self.scan_once().await;
                }
            }
        }
    }

    async fn scan_once(&self) {
        let orders = match self.repository.list_new_orders().await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list NEW orders, skipping this tick");
                return;
            }
        };

        for order in orders {
            // Blocks on a full channel: the intended backpressure against a
            // pool that's still catching up on the previous tick.
            if self.dispatch.send(order.number).await.is_err() {
                tracing::info!("dispatch channel closed, scanner stopping mid-tick");
                return;
            }
            metrics::counter!("orders_dispatched_total").increment(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_orders::{InMemoryOrderRepository, Order};
    use uuid::Uuid;

    #[tokio::test]
    async fn scan_once_enqueues_every_new_order() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        repo.seed(Order::new("3086248659".to_string(), Uuid::now_v7())).await;
        repo.seed(Order::new("12345678903".to_string(), Uuid::now_v7())).await;

        let (tx, mut rx) = mpsc::channel(4);
        let scanner = Scanner::new(repo, tx, Duration::from_secs(1));

        scanner.scan_once().await;

        let mut seen = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
        seen.sort();
        assert_eq!(seen, vec!["12345678903", "3086248659"]);
    }
}
