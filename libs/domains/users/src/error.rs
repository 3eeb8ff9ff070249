use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("login '{0}' is already registered")]
    LoginTaken(String),

    #[error("invalid login/password")]
    InvalidCredentials,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("password hashing error: {0}")]
    PasswordHash(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            UserError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("user {} not found", id),
            ),
            UserError::LoginTaken(login) => (
                StatusCode::CONFLICT,
                "duplicate",
                format!("login '{}' is already registered", login),
            ),
            UserError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "invalid login/password".to_string(),
            ),
            UserError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            UserError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "unauthorized".to_string(),
            ),
            UserError::PasswordHash(msg) => {
                tracing::error!("password hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "an internal error occurred".to_string(),
                )
            }
            UserError::Internal(msg) => {
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
