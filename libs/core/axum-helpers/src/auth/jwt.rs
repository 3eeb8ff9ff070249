use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Access token lifetime in seconds (15 minutes).
pub const ACCESS_TOKEN_TTL: i64 = 900;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token encoding failed: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    pub jti: Uuid,
}

/// Stateless JWT issuer/verifier.
///
/// Unlike a Redis-backed auth store, this has no revocation list: a token is
/// valid until it expires. That's sufficient for a service with no logout
/// endpoint.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
}

impl JwtAuth {
    pub fn new(config: &super::JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
        }
    }

    pub fn create_access_token(&self, user_id: Uuid) -> Result<String, JwtError> {
        let now = chrono::Utc::now().timestamp();
        let claims = JwtClaims {
            sub: user_id,
            iat: now,
            exp: now + ACCESS_TOKEN_TTL,
            jti: Uuid::new_v4(),
        };
        let header = Header::new(jsonwebtoken::Algorithm::HS256);
        encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(JwtError::Encode)
    }

    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, JwtError> {
        let data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(jsonwebtoken::Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}
