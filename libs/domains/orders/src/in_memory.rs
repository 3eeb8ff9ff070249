use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{AddOrderOutcome, Balance, Order, OrderStatus, Withdrawal};
use crate::repository::OrderRepository;

/// In-memory implementation (unit tests for the service layer and the
/// accrual pipeline).
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<String, Order>>>,
    withdrawals: Arc<RwLock<Vec<(Uuid, Withdrawal)>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test helper: seed a NEW order directly, bypassing submission rules.
    pub async fn seed(&self, order: Order) {
        self.orders.write().await.insert(order.number.clone(), order);
    }

    pub async fn get(&self, number: &str) -> Option<Order> {
        self.orders.read().await.get(number).cloned()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn list_new_orders(&self) -> OrderResult<Vec<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.status == OrderStatus::New)
            .cloned()
            .collect())
    }

    async fn set_status(&self, number: &str, status: OrderStatus) -> OrderResult<()> {
        let mut orders = self.orders.write().await;
        if let Some(order) = orders.get_mut(number) {
            order.status = status;
        }
        Ok(())
    }

    async fn apply_accrual(&self, number: &str, status: OrderStatus, accrual: i64) -> OrderResult<()> {
        let mut orders = self.orders.write().await;
        if let Some(order) = orders.get_mut(number) {
            order.status = status;
            order.accrual = accrual;
        }
        Ok(())
    }

    async fn add_order_to_user(&self, user_id: Uuid, number: &str) -> OrderResult<AddOrderOutcome> {
        let mut orders = self.orders.write().await;
        if let Some(existing) = orders.get(number) {
            return Ok(if existing.user_id == user_id {
                AddOrderOutcome::AlreadySubmittedBySameUser(existing.clone())
            } else {
                AddOrderOutcome::ConflictOtherUser
            });
        }

        let order = Order::new(number.to_string(), user_id);
        orders.insert(number.to_string(), order.clone());
        Ok(AddOrderOutcome::Created(order))
    }

    async fn get_orders_by_user(&self, user_id: Uuid) -> OrderResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.uploaded_date);
        Ok(orders)
    }

    async fn get_balance_by_user(&self, user_id: Uuid) -> OrderResult<Balance> {
        let earned: i64 = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.user_id == user_id && o.status == OrderStatus::Processed)
            .map(|o| o.accrual)
            .sum();

        let withdrawn: i64 = self
            .withdrawals
            .read()
            .await
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, w)| w.sum)
            .sum();

        Ok(Balance {
            current: earned - withdrawn,
            withdrawn,
        })
    }

    async fn add_withdraw(&self, user_id: Uuid, order_number: &str, sum: i64) -> OrderResult<Withdrawal> {
        let balance = self.get_balance_by_user(user_id).await?;
        if balance.current < sum {
            return Err(OrderError::InsufficientBalance {
                have: balance.current,
                requested: sum,
            });
        }

        let compensating = Order {
            id: Uuid::now_v7(),
            number: order_number.to_string(),
            user_id,
            status: OrderStatus::Processed,
            accrual: 0,
            uploaded_date: Utc::now(),
        };
        self.orders
            .write()
            .await
            .insert(order_number.to_string(), compensating);

        let withdrawal = Withdrawal {
            id: Uuid::now_v7(),
            order_number: order_number.to_string(),
            sum,
            processed_date: Utc::now(),
        };
        self.withdrawals.write().await.push((user_id, withdrawal.clone()));

        Ok(withdrawal)
    }

    async fn get_withdrawals_by_user(&self, user_id: Uuid) -> OrderResult<Vec<Withdrawal>> {
        let mut withdrawals: Vec<Withdrawal> = self
            .withdrawals
            .read()
            .await
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, w)| w.clone())
            .collect();
        withdrawals.sort_by_key(|w| w.processed_date);
        Ok(withdrawals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    #[tokio::test]
    async fn list_new_orders_only_returns_new() {
        let repo = InMemoryOrderRepository::new();
        let user = Uuid::now_v7();
        repo.seed(Order::new("3086248659".to_string(), user)).await;
        repo.set_status("3086248659", OrderStatus::Processing).await.unwrap();

        assert!(repo.list_new_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_status_missing_order_is_noop() {
        let repo = InMemoryOrderRepository::new();
        assert!(repo.set_status("does-not-exist", OrderStatus::Invalid).await.is_ok());
    }

    #[tokio::test]
    async fn add_order_twice_same_user_reports_already_submitted() {
        let repo = InMemoryOrderRepository::new();
        let user = Uuid::now_v7();
        repo.add_order_to_user(user, "3086248659").await.unwrap();

        match repo.add_order_to_user(user, "3086248659").await.unwrap() {
            AddOrderOutcome::AlreadySubmittedBySameUser(o) => assert_eq!(o.number, "3086248659"),
            _ => panic!("expected AlreadySubmittedBySameUser"),
        }
    }

    #[tokio::test]
    async fn add_order_twice_different_user_conflicts() {
        let repo = InMemoryOrderRepository::new();
        repo.add_order_to_user(Uuid::now_v7(), "3086248659").await.unwrap();

        match repo.add_order_to_user(Uuid::now_v7(), "3086248659").await.unwrap() {
            AddOrderOutcome::ConflictOtherUser => {}
            _ => panic!("expected ConflictOtherUser"),
        }
    }

    #[tokio::test]
    async fn withdraw_decreases_current_and_increases_withdrawn() {
        let repo = InMemoryOrderRepository::new();
        let user = Uuid::now_v7();
        let mut order = Order::new("3086248659".to_string(), user);
        order.status = OrderStatus::Processed;
        order.accrual = 10000;
        repo.seed(order).await;

        repo.add_withdraw(user, "79927398713", 3000).await.unwrap();

        let balance = repo.get_balance_by_user(user).await.unwrap();
        assert_eq!(balance.current, 7000);
        assert_eq!(balance.withdrawn, 3000);
    }

    #[tokio::test]
    async fn withdraw_rejects_insufficient_balance() {
        let repo = InMemoryOrderRepository::new();
        let user = Uuid::now_v7();
        let result = repo.add_withdraw(user, "79927398713", 100).await;
        assert!(matches!(result, Err(OrderError::InsufficientBalance { .. })));
    }
}
