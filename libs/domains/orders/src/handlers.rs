use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_helpers::JwtClaims;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::OrderError;
use crate::models::{AddOrderOutcome, Order, OrderStatus, Withdrawal};
use crate::repository::OrderRepository;
use crate::service::OrderService;

/// Shared state for the `/api/user/{orders,balance,withdrawals}` routes.
#[derive(Clone)]
pub struct OrderState<R: OrderRepository> {
    pub service: Arc<OrderService<R>>,
}

impl<R: OrderRepository> OrderState<R> {
    pub fn new(service: OrderService<R>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub number: String,
    pub status: OrderStatus,
    /// Present only once the pipeline has scored the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accrual: Option<f64>,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let accrual = (order.status == OrderStatus::Processed).then(|| order.accrual_major_units());
        Self {
            number: order.number,
            status: order.status,
            accrual,
            uploaded_at: order.uploaded_date,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub current: f64,
    pub withdrawn: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawRequest {
    pub order: String,
    pub sum: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WithdrawalResponse {
    pub order: String,
    pub sum: f64,
    pub processed_at: chrono::DateTime<chrono::Utc>,
}

impl From<Withdrawal> for WithdrawalResponse {
    fn from(w: Withdrawal) -> Self {
        Self {
            sum: w.sum_major_units(),
            order: w.order_number,
            processed_at: w.processed_date,
        }
    }
}

/// `POST /api/user/orders` — body is the raw order number, not JSON.
async fn submit_order<R: OrderRepository>(
    State(state): State<OrderState<R>>,
    Extension(claims): Extension<JwtClaims>,
    body: String,
) -> Result<Response, OrderError> {
    let number = body.trim();
    match state.service.submit_order(claims.sub, number).await? {
        AddOrderOutcome::Created(_) => Ok(StatusCode::ACCEPTED.into_response()),
        AddOrderOutcome::AlreadySubmittedBySameUser(_) => Ok(StatusCode::OK.into_response()),
        AddOrderOutcome::ConflictOtherUser => Ok(StatusCode::CONFLICT.into_response()),
    }
}

/// `GET /api/user/orders` — `[]` (never 204) when the user has none.
async fn list_orders<R: OrderRepository>(
    State(state): State<OrderState<R>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<Vec<OrderResponse>>, OrderError> {
    let orders = state.service.list_orders(claims.sub).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// `GET /api/user/balance`.
async fn get_balance<R: OrderRepository>(
    State(state): State<OrderState<R>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<BalanceResponse>, OrderError> {
    let balance = state.service.get_balance(claims.sub).await?;
    Ok(Json(BalanceResponse {
        current: balance.current_major_units(),
        withdrawn: balance.withdrawn_major_units(),
    }))
}

/// `POST /api/user/balance/withdraw`.
async fn withdraw<R: OrderRepository>(
    State(state): State<OrderState<R>>,
    Extension(claims): Extension<JwtClaims>,
    Json(input): Json<WithdrawRequest>,
) -> Result<StatusCode, OrderError> {
    let sum_hundredths = (input.sum * 100.0).round() as i64;
    state.service.withdraw(claims.sub, &input.order, sum_hundredths).await?;
    Ok(StatusCode::OK)
}

/// `GET /api/user/withdrawals` — `204 No Content` when the user has none,
/// matching the original system (unlike `GET /orders`, which always returns
/// an array).
async fn list_withdrawals<R: OrderRepository>(
    State(state): State<OrderState<R>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Response, OrderError> {
    let withdrawals = state.service.list_withdrawals(claims.sub).await?;
    if withdrawals.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let body: Vec<WithdrawalResponse> = withdrawals.into_iter().map(WithdrawalResponse::from).collect();
    Ok(Json(body).into_response())
}

/// Router for `/api/user/{orders,balance,balance/withdraw,withdrawals}`.
///
/// The caller is responsible for layering `jwt_auth_middleware` over this
/// router so `Extension<JwtClaims>` is populated.
pub fn router<R: OrderRepository + Clone + 'static>(state: OrderState<R>) -> Router {
    Router::new()
        .route("/orders", post(submit_order::<R>).get(list_orders::<R>))
        .route("/balance", get(get_balance::<R>))
        .route("/balance/withdraw", post(withdraw::<R>))
        .route("/withdrawals", get(list_withdrawals::<R>))
        .with_state(state)
}
