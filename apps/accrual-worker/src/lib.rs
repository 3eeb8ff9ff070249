//! Accrual Worker Service
//!
//! Background worker that scans submitted orders and scores them against an
//! external loyalty accrual system.
//!
//! ## Architecture
//!
//! ```text
//! Scanner ──dispatch channel──▶ Worker pool ──▶ external accrual system
//!                                    │
//!                                    ▼
//!                             PostgreSQL (orders, withdrawals)
//! ```
//!
//! ## Features
//!
//! - Configurable worker pool size and scan interval
//! - Process-wide pause/backoff when the external system rate-limits
//! - Health check endpoint for Kubernetes probes
//! - Graceful shutdown handling

use accrual_pipeline::{AccrualClient, Supervisor};
use axum::{routing::get, Router};
use axum_helpers::health::{health_handler, ready_handler};
use axum_helpers::shutdown_signal;
use core_config::accrual::AccrualConfig;
use core_config::{Environment, FromEnv};
use database::postgres::{connect_from_config_with_retry, PostgresConfig};
use domain_orders::PostgresOrderRepository;
use eyre::{Result, WrapErr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Start the health/metrics HTTP server.
///
/// Provides endpoints for:
/// - Liveness probes: `/health`
/// - Readiness probes: `/ready`
/// - Prometheus metrics: `/metrics`
async fn start_health_server(port: u16) -> Result<()> {
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/metrics", get(observability::metrics_handler));

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind health server to {}", addr))?;

    info!(port = %port, "Health server listening");

    axum::serve(listener, app)
        .await
        .wrap_err("Health server failed")?;

    Ok(())
}

/// Run the accrual worker.
///
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Connects to PostgreSQL for order persistence
/// 3. Spawns the scanner/worker pool supervisor
/// 4. Waits for a shutdown signal, then drains the pipeline gracefully
pub async fn run() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    observability::init_metrics();

    info!("Starting accrual worker service");
    info!("Environment: {:?}", environment);

    let health_port: u16 = std::env::var("ACCRUAL_WORKER_HEALTH_PORT")
        .or_else(|_| std::env::var("HEALTH_PORT"))
        .unwrap_or_else(|_| "8082".to_string())
        .parse()
        .unwrap_or(8082);

    let pg_config =
        PostgresConfig::from_env().wrap_err("Failed to load PostgreSQL configuration")?;

    info!("Connecting to PostgreSQL...");
    let db = connect_from_config_with_retry(pg_config, None)
        .await
        .wrap_err("Failed to connect to PostgreSQL")?;
    info!("Connected to PostgreSQL successfully");

    let accrual_config =
        AccrualConfig::from_env().wrap_err("Failed to load accrual pipeline configuration")?;
    info!(
        system_address = %accrual_config.system_address,
        interval_secs = accrual_config.interval_secs,
        updaters_count = accrual_config.updaters_count,
        "Accrual pipeline configuration loaded"
    );

    let repository = Arc::new(PostgresOrderRepository::new(db));
    let client = AccrualClient::new(&accrual_config.system_address)
        .wrap_err("Failed to build accrual HTTP client")?;

    let supervisor = Supervisor::spawn(
        repository,
        client,
        accrual_config.updaters_count,
        Duration::from_secs(accrual_config.interval_secs),
    );

    tokio::spawn(async move {
        if let Err(e) = start_health_server(health_port).await {
            error!(error = %e, "Health server failed");
        }
    });

    shutdown_signal().await;

    info!("Shutting down accrual pipeline...");
    supervisor.shutdown().await;

    info!("Accrual worker service stopped");
    Ok(())
}
