//! Orders domain: order submission, accrual bookkeeping, balance and
//! withdrawals.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (submit/list orders, balance, withdraw)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Luhn validation, orchestration
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access; also the accrual pipeline's store contract
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Order, Withdrawal, Balance, AddOrderOutcome
//! └─────────────┘
//! ```

pub mod error;
pub mod handlers;
pub mod in_memory;
pub mod luhn;
pub mod models;
pub mod postgres_repository_impl;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use handlers::OrderState;
pub use in_memory::InMemoryOrderRepository;
pub use models::{AddOrderOutcome, Balance, Order, OrderStatus, Withdrawal};
pub use postgres_repository_impl::PostgresOrderRepository;
pub use repository::OrderRepository;
pub use service::OrderService;
