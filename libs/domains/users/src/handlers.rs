use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use axum_helpers::{JwtAuth, ValidatedJson};
use std::sync::Arc;

use crate::error::UserError;
use crate::models::Credentials;
use crate::repository::UserRepository;
use crate::service::UserService;

/// Shared state for the registration/login routes.
#[derive(Clone)]
pub struct AuthState<R: UserRepository> {
    pub service: Arc<UserService<R>>,
    pub jwt: JwtAuth,
}

impl<R: UserRepository> AuthState<R> {
    pub fn new(service: UserService<R>, jwt: JwtAuth) -> Self {
        Self {
            service: Arc::new(service),
            jwt,
        }
    }
}

fn bearer_response(token: &str) -> Result<Response, UserError> {
    let header_value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| UserError::Internal(format!("failed to build auth header: {e}")))?;

    let mut response = StatusCode::OK.into_response();
    response.headers_mut().insert(header::AUTHORIZATION, header_value);
    Ok(response)
}

/// `POST /api/user/register` — create an account and return a bearer token
/// via the `Authorization` response header.
async fn register<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<Credentials>,
) -> Result<Response, UserError> {
    let user = state.service.register(input).await?;
    let token = state
        .jwt
        .create_access_token(user.id)
        .map_err(|e| UserError::Internal(format!("failed to create token: {e}")))?;
    bearer_response(&token)
}

/// `POST /api/user/login` — verify credentials and return a bearer token via
/// the `Authorization` response header.
async fn login<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<Credentials>,
) -> Result<Response, UserError> {
    let user = state.service.login(input).await?;
    let token = state
        .jwt
        .create_access_token(user.id)
        .map_err(|e| UserError::Internal(format!("failed to create token: {e}")))?;
    bearer_response(&token)
}

/// Router for `/api/user/register` and `/api/user/login`.
pub fn router<R: UserRepository + Clone + 'static>(state: AuthState<R>) -> Router {
    Router::new()
        .route("/register", post(register::<R>))
        .route("/login", post(login::<R>))
        .with_state(state)
}
