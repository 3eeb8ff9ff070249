use async_trait::async_trait;
use uuid::Uuid;

use crate::error::OrderResult;
use crate::models::{AddOrderOutcome, Balance, Order, OrderStatus, Withdrawal};

/// Data access the orders domain needs from durable storage.
///
/// This trait is the "capability set" the accrual pipeline depends on: it
/// only ever calls [`list_new_orders`](OrderRepository::list_new_orders),
/// [`set_status`](OrderRepository::set_status) and
/// [`apply_accrual`](OrderRepository::apply_accrual) — the remaining
/// methods exist for the HTTP-facing [`OrderService`](crate::OrderService).
/// Any backend (relational, in-memory) satisfying the whole trait is
/// substitutable for both callers.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// All orders with `status = NEW`. Ordering is unspecified but stable
    /// across identical snapshots.
    async fn list_new_orders(&self) -> OrderResult<Vec<Order>>;

    /// Unconditional status update. A no-op (not an error) if `number`
    /// doesn't exist — the worker is not the authority on whether an order
    /// still exists, only on what its status should become.
    async fn set_status(&self, number: &str, status: OrderStatus) -> OrderResult<()>;

    /// Atomic update of `status` and `accrual` together.
    async fn apply_accrual(&self, number: &str, status: OrderStatus, accrual: i64) -> OrderResult<()>;

    /// Insert a brand-new NEW order for `user_id`, or report the existing
    /// row's ownership if `number` is already taken.
    async fn add_order_to_user(&self, user_id: Uuid, number: &str) -> OrderResult<AddOrderOutcome>;

    async fn get_orders_by_user(&self, user_id: Uuid) -> OrderResult<Vec<Order>>;

    async fn get_balance_by_user(&self, user_id: Uuid) -> OrderResult<Balance>;

    /// Atomically creates a compensating PROCESSED order (accrual = 0) plus
    /// a withdrawals row, assuming the caller has already checked balance.
    async fn add_withdraw(&self, user_id: Uuid, order_number: &str, sum: i64) -> OrderResult<Withdrawal>;

    async fn get_withdrawals_by_user(&self, user_id: Uuid) -> OrderResult<Vec<Withdrawal>>;
}
