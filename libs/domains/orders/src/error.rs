use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order number '{0}' is not Luhn-valid")]
    InvalidNumber(String),

    #[error("insufficient balance: have {have}, requested {requested}")]
    InsufficientBalance { have: i64, requested: i64 },

    #[error("internal error: {0}")]
    Internal(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            OrderError::InvalidNumber(n) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_order_number",
                format!("order number '{}' is not Luhn-valid", n),
            ),
            OrderError::InsufficientBalance { have, requested } => (
                StatusCode::PAYMENT_REQUIRED,
                "insufficient_balance",
                format!("have {have} hundredths, requested {requested}"),
            ),
            OrderError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "an internal error occurred".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({ "error": { "type": error_type, "message": message } })),
        )
            .into_response()
    }
}
