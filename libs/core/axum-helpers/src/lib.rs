//! # Axum Helpers
//!
//! A collection of utilities, middleware, and helpers for building Axum web applications.
//!
//! ## Features
//!
//! - **Server Management**: Easy server setup with graceful shutdown
//! - **Middleware**: Security headers, CORS
//! - **Error Handling**: Structured error responses with proper HTTP status codes
//! - **Health Checks**: Built-in health and readiness endpoints
//! - **OpenAPI Documentation**: Integrated Swagger UI, ReDoc, RapiDoc, and Scalar
//! - **Extractors**: Custom extractors for common use cases
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(api_routes).await?;
//!
//!     let config = ServerConfig::default();
//!     create_app(router, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cleanup;
pub mod errors;
pub mod extractors;
pub mod health;
pub mod middleware;
pub mod server;
pub mod shutdown;

// Re-export commonly used types
pub use auth::{JwtAuth, JwtClaims, JwtConfig, ACCESS_TOKEN_TTL};
pub use cleanup::CleanupCoordinator;
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use health::{HealthResponse, ReadyResponse};
pub use server::{create_app, create_production_app, create_router};
pub use shutdown::{shutdown_signal, ShutdownCoordinator};

// Re-export middleware functions
pub use middleware::cors::{create_cors_layer, create_permissive_cors_layer};
pub use middleware::security::security_headers;

// Re-export extractors
pub use extractors::{UuidPath, ValidatedJson};
