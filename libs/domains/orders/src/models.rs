use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Status of an order as tracked by the accrual pipeline.
///
/// `New` and the two terminal states (`Invalid`, `Processed`) are the only
/// statuses the HTTP layer needs to reason about; `Processing` is visible
/// only while the pipeline is mid-flight on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    #[serde(rename = "NEW")]
    New,
    #[serde(rename = "PROCESSING")]
    Processing,
    #[serde(rename = "INVALID")]
    Invalid,
    #[serde(rename = "PROCESSED")]
    Processed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Invalid => "INVALID",
            OrderStatus::Processed => "PROCESSED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW" => Some(OrderStatus::New),
            "PROCESSING" => Some(OrderStatus::Processing),
            "INVALID" => Some(OrderStatus::Invalid),
            "PROCESSED" => Some(OrderStatus::Processed),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The central mutable entity: a user-submitted order number awaiting (or
/// having received) a score from the external accrual service.
///
/// `accrual` is always integer hundredths of the base unit; `accrual > 0`
/// implies `status == Processed` for the lifetime of the row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub number: String,
    pub user_id: Uuid,
    pub status: OrderStatus,
    /// Hundredths of the base unit. Zero until the pipeline scores the order.
    pub accrual: i64,
    pub uploaded_date: DateTime<Utc>,
}

impl Order {
    pub fn new(number: String, user_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            number,
            user_id,
            status: OrderStatus::New,
            accrual: 0,
            uploaded_date: Utc::now(),
        }
    }

    /// Points in major units, rounded to two decimals for the wire.
    pub fn accrual_major_units(&self) -> f64 {
        self.accrual as f64 / 100.0
    }
}

/// The outcome of submitting an order number for a user, distinguishing the
/// three cases the HTTP handler must map to different status codes.
pub enum AddOrderOutcome {
    /// Freshly created — the handler returns 202.
    Created(Order),
    /// Already submitted by the same user — the handler returns 200.
    AlreadySubmittedBySameUser(Order),
    /// Submitted by a different user — the handler returns 409.
    ConflictOtherUser,
}

/// A spend of points against a fresh, Luhn-valid order number.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Withdrawal {
    pub id: Uuid,
    pub order_number: String,
    /// Hundredths of the base unit.
    pub sum: i64,
    pub processed_date: DateTime<Utc>,
}

impl Withdrawal {
    /// Points in major units, rounded to two decimals for the wire.
    pub fn sum_major_units(&self) -> f64 {
        self.sum as f64 / 100.0
    }
}

/// Derived, never stored: computed fresh from `orders` and `withdrawals` on
/// every read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct Balance {
    pub current: i64,
    pub withdrawn: i64,
}

impl Balance {
    pub fn current_major_units(&self) -> f64 {
        self.current as f64 / 100.0
    }

    pub fn withdrawn_major_units(&self) -> f64 {
        self.withdrawn as f64 / 100.0
    }
}
