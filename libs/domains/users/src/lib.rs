//! Users domain: login/password accounts.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (register, login)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Argon2 hashing, credential verification
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User entity, Credentials DTO
//! └─────────────┘
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres_repository_impl;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::AuthState;
pub use models::{Credentials, User};
pub use postgres_repository_impl::PostgresUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
