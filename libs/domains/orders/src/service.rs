use std::sync::Arc;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::luhn;
use crate::models::{AddOrderOutcome, Balance, Order, Withdrawal};
use crate::repository::OrderRepository;

/// Business logic for order submission, balance queries and withdrawals.
///
/// The accrual pipeline does not go through this service: it talks to the
/// repository directly, since it has no user-facing validation to perform.
#[derive(Clone)]
pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Submit an order number for accrual processing.
    ///
    /// Validates the Luhn checksum before touching storage; an order number
    /// that fails the checksum is rejected outright regardless of whether it
    /// was already submitted by anyone.
    pub async fn submit_order(&self, user_id: Uuid, number: &str) -> OrderResult<AddOrderOutcome> {
        if !luhn::is_valid(number) {
            return Err(OrderError::InvalidNumber(number.to_string()));
        }

        self.repository.add_order_to_user(user_id, number).await
    }

    pub async fn list_orders(&self, user_id: Uuid) -> OrderResult<Vec<Order>> {
        self.repository.get_orders_by_user(user_id).await
    }

    pub async fn get_balance(&self, user_id: Uuid) -> OrderResult<Balance> {
        self.repository.get_balance_by_user(user_id).await
    }

    /// Spend points against a fresh order number.
    ///
    /// The order number submitted for a withdrawal is itself Luhn-checked —
    /// withdrawals are addressed by order number the same way accrual orders
    /// are, even though no accrual is ever computed for them.
    pub async fn withdraw(&self, user_id: Uuid, order_number: &str, sum: i64) -> OrderResult<Withdrawal> {
        if !luhn::is_valid(order_number) {
            return Err(OrderError::InvalidNumber(order_number.to_string()));
        }

        self.repository.add_withdraw(user_id, order_number, sum).await
    }

    pub async fn list_withdrawals(&self, user_id: Uuid) -> OrderResult<Vec<Withdrawal>> {
        self.repository.get_withdrawals_by_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryOrderRepository;

    fn service() -> OrderService<InMemoryOrderRepository> {
        OrderService::new(InMemoryOrderRepository::new())
    }

    #[tokio::test]
    async fn submit_rejects_invalid_checksum() {
        let svc = service();
        let result = svc.submit_order(Uuid::now_v7(), "1234567890").await;
        assert!(matches!(result, Err(OrderError::InvalidNumber(_))));
    }

    #[tokio::test]
    async fn submit_then_list_returns_the_order() {
        let svc = service();
        let user = Uuid::now_v7();
        svc.submit_order(user, "3086248659").await.unwrap();

        let orders = svc.list_orders(user).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].number, "3086248659");
    }

    #[tokio::test]
    async fn withdraw_rejects_invalid_order_number() {
        let svc = service();
        let result = svc.withdraw(Uuid::now_v7(), "not-a-number", 100).await;
        assert!(matches!(result, Err(OrderError::InvalidNumber(_))));
    }

    #[tokio::test]
    async fn withdraw_with_no_balance_is_rejected() {
        let svc = service();
        let result = svc.withdraw(Uuid::now_v7(), "79927398713", 100).await;
        assert!(matches!(result, Err(OrderError::InsufficientBalance { .. })));
    }
}
