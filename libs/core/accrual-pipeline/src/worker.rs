use std::sync::Arc;

use domain_orders::{OrderRepository, OrderStatus};
use tokio::sync::{Mutex, broadcast, mpsc, watch};

use crate::client::{AccrualClient, AccrualResponse, RemoteOrderStatus};
use crate::pause::{PauseController, recv_pause_signal};

/// One long-lived worker task: pulls order numbers off the shared dispatch
/// channel, calls the accrual client, and drives the order through its state
/// machine via the repository.
pub struct Worker<R: OrderRepository> {
    id: usize,
    dispatch: Arc<Mutex<mpsc::Receiver<String>>>,
    pause: Arc<PauseController>,
    pause_rx: broadcast::Receiver<u64>,
    client: AccrualClient,
    repository: Arc<R>,
}

impl<R: OrderRepository> Worker<R> {
    pub fn new(
        id: usize,
        dispatch: Arc<Mutex<mpsc::Receiver<String>>>,
        pause: Arc<PauseController>,
        client: AccrualClient,
        repository: Arc<R>,
    ) -> Self {
        let pause_rx = pause.subscribe();
        Self {
            id,
            dispatch,
            pause,
            pause_rx,
            client,
            repository,
        }
    }

    /// Runs until `shutdown` reports `true`. Selects, in priority order,
    /// between shutdown, a pause broadcast, and the next dispatch item —
    /// `biased` makes that priority explicit rather than left to chance.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(worker_id = self.id, "worker started");

        loop {
            let next = {
                let mut dispatch = self.dispatch.lock().await;
                tokio::select! {
                    biased;

                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            tracing::info!(worker_id = self.id, "worker stopping on shutdown signal");
                            return;
                        }
                        continue;
                    }

                    signal = recv_pause_signal(&mut self.pause_rx) => {
                        drop(dispatch);
                        if let Some(retry_after_seconds) = signal {
                            self.pause.begin_pause(retry_after_seconds);
                        }
                        continue;
                    }

                    item = dispatch.recv() => item,
                }
            };

            let Some(number) = next else {
                tracing::info!(worker_id = self.id, "dispatch channel closed, worker stopping");
                return;
            };

            self.process_order(&number).await;
        }
    }

    async fn process_order(&self, number: &str) {
        if self.pause.is_paused() {
            tracing::debug!(worker_id = self.id, order_number = number, "paused, dropping for next scan");
            return;
        }

        if let Err(e) = self.repository.set_status(number, OrderStatus::Processing).await {
            tracing::error!(worker_id = self.id, order_number = number, error = %e, "failed to mark order PROCESSING");
            return;
        }

        let response = self.client.fetch(number).await;
        metrics::counter!("accrual_fetch_total", "result" => result_label(&response)).increment(1);

        match response {
            AccrualResponse::Ok { status: RemoteOrderStatus::Invalid, .. } => {
                self.set_status_logged(number, OrderStatus::Invalid).await;
            }
            AccrualResponse::Ok {
                status: RemoteOrderStatus::Registered | RemoteOrderStatus::Processing,
                ..
            } => {
                self.set_status_logged(number, OrderStatus::New).await;
            }
            AccrualResponse::Ok {
                status: RemoteOrderStatus::Processed,
                accrual,
            } => {
                let accrual = accrual.unwrap_or(0);
                if let Err(e) = self
                    .repository
                    .apply_accrual(number, OrderStatus::Processed, accrual)
                    .await
                {
                    tracing::error!(worker_id = self.id, order_number = number, error = %e, "failed to apply accrual");
                }
            }
            AccrualResponse::NotRegistered => {
                self.set_status_logged(number, OrderStatus::Invalid).await;
            }
            AccrualResponse::RateLimited { retry_after_seconds } => {
                tracing::warn!(worker_id = self.id, order_number = number, retry_after_seconds, "rate limited");
                // Left in PROCESSING: the pause broadcast, not this call, is
                // responsible for retrying it via the next scan.
                self.pause.observe_rate_limit(retry_after_seconds);
            }
            AccrualResponse::RemoteError => {
                tracing::warn!(worker_id = self.id, order_number = number, "remote error from accrual service");
                self.set_status_logged(number, OrderStatus::New).await;
            }
            AccrualResponse::TransportError => {
                tracing::warn!(worker_id = self.id, order_number = number, "transport error calling accrual service");
                self.set_status_logged(number, OrderStatus::New).await;
            }
        }
    }

    async fn set_status_logged(&self, number: &str, status: OrderStatus) {
        if let Err(e) = self.repository.set_status(number, status).await {
            tracing::error!(worker_id = self.id, order_number = number, error = %e, "failed to update order status");
        }
    }
}

fn result_label(response: &AccrualResponse) -> &'static str {
    match response {
        AccrualResponse::Ok { status: RemoteOrderStatus::Invalid, .. } => "invalid",
        AccrualResponse::Ok { status: RemoteOrderStatus::Registered, .. } => "registered",
        AccrualResponse::Ok { status: RemoteOrderStatus::Processing, .. } => "processing",
        AccrualResponse::Ok { status: RemoteOrderStatus::Processed, .. } => "processed",
        AccrualResponse::NotRegistered => "not_registered",
        AccrualResponse::RateLimited { .. } => "rate_limited",
        AccrualResponse::RemoteError => "remote_error",
        AccrualResponse::TransportError => "transport_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_orders::{InMemoryOrderRepository, Order};
    use uuid::Uuid;

    fn channel() -> (mpsc::Sender<String>, Arc<Mutex<mpsc::Receiver<String>>>) {
        let (tx, rx) = mpsc::channel(4);
        (tx, Arc::new(Mutex::new(rx)))
    }

    #[tokio::test]
    async fn paused_worker_drops_the_item_without_calling_out() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        repo.seed(Order::new("3086248659".to_string(), Uuid::now_v7())).await;

        let pause = Arc::new(PauseController::new(1));
        pause.begin_pause(60);

        let (_tx, dispatch) = channel();
        let client = AccrualClient::new("http://localhost:0").unwrap();
        let worker = Worker::new(0, dispatch, pause, client, repo.clone());

        worker.process_order("3086248659").await;

        // Still NEW: process_order returned immediately on the paused check,
        // never reaching the PROCESSING transition.
        assert_eq!(repo.get("3086248659").await.unwrap().status, domain_orders::OrderStatus::New);
    }
}
