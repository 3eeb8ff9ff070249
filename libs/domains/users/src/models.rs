use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A registered account. Accounts are login/password only — this system has
/// no OAuth, email verification, or roles.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub login: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub registration_date: DateTime<Utc>,
}

impl User {
    pub fn new(login: String, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            login,
            password_hash,
            registration_date: Utc::now(),
        }
    }
}

/// DTO for registration and login requests — same shape for both.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    #[validate(length(min = 1, max = 255))]
    pub login: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
