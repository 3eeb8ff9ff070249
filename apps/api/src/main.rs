//! Loyalty points HTTP API.
//!
//! Wires `domain_users` and `domain_orders` against Postgres behind JWT
//! authentication, mirroring `apps/accrual-worker`'s startup shape.

mod openapi;

use axum::{middleware, Router};
use axum_helpers::auth::{JwtAuth, JwtConfig};
use axum_helpers::server::{create_production_app, create_router};
use core_config::server::ServerConfig;
use core_config::{Environment, FromEnv};
use database::postgres::{connect_from_config_with_retry, PostgresConfig};
use domain_orders::{OrderService, OrderState, PostgresOrderRepository};
use domain_users::{AuthState, PostgresUserRepository, UserService};
use eyre::{Result, WrapErr};
use std::time::Duration;
use tracing::info;

use openapi::ApiDoc;

/// `RUN_ADDRESS` wins when set (matching the original system); otherwise
/// falls back to this workspace's `HOST`/`PORT` pair.
fn server_config_from_env() -> Result<ServerConfig> {
    if let Ok(addr) = std::env::var("RUN_ADDRESS") {
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| eyre::eyre!("RUN_ADDRESS must be host:port, got '{addr}'"))?;
        let port: u16 = port
            .parse()
            .wrap_err_with(|| format!("RUN_ADDRESS has an invalid port: '{port}'"))?;
        return Ok(ServerConfig::new(host.to_string(), port));
    }

    ServerConfig::from_env().wrap_err("Failed to load server configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);
    observability::init_metrics();

    info!("Starting loyalty API service");
    info!("Environment: {:?}", environment);

    let pg_config =
        PostgresConfig::from_env().wrap_err("Failed to load PostgreSQL configuration")?;
    info!("Connecting to PostgreSQL...");
    let db = connect_from_config_with_retry(pg_config, None)
        .await
        .wrap_err("Failed to connect to PostgreSQL")?;
    info!("Connected to PostgreSQL successfully");

    let jwt_config = JwtConfig::from_env().wrap_err("Failed to load JWT configuration")?;
    let jwt = JwtAuth::new(&jwt_config);

    let user_service = UserService::new(PostgresUserRepository::new(db.clone()));
    let auth_state = AuthState::new(user_service, jwt.clone());

    let order_service = OrderService::new(PostgresOrderRepository::new(db.clone()));
    let order_state = OrderState::new(order_service);

    let protected_orders = domain_orders::handlers::router(order_state)
        .layer(middleware::from_fn_with_state(jwt, axum_helpers::auth::jwt_auth_middleware));

    let user_routes = Router::new().nest("/user", domain_users::handlers::router(auth_state));
    let order_routes = Router::new().nest("/user", protected_orders);

    let api_routes = Router::new().merge(user_routes).merge(order_routes);

    let router = create_router::<ApiDoc>(api_routes)
        .await
        .wrap_err("Failed to build router")?;

    let server_config = server_config_from_env()?;

    create_production_app(router, &server_config, Duration::from_secs(30), async move {
        db.close().await.ok();
    })
    .await
    .wrap_err("Server error")?;

    info!("Loyalty API service stopped");
    Ok(())
}
