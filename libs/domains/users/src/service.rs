use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{Credentials, User};
use crate::repository::UserRepository;

/// Business logic for account registration and login.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a new account, hashing the password with Argon2.
    pub async fn register(&self, input: Credentials) -> UserResult<User> {
        let password_hash = self.hash_password(&input.password)?;
        let user = User::new(input.login, password_hash);
        self.repository.create(user).await
    }

    /// Verify login credentials, returning the account on success.
    pub async fn login(&self, input: Credentials) -> UserResult<User> {
        let user = self
            .repository
            .get_by_login(&input.login)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(&input.password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;

    fn service() -> UserService<InMemoryUserRepository> {
        UserService::new(InMemoryUserRepository::new())
    }

    #[tokio::test]
    async fn register_then_login() {
        let svc = service();
        let creds = Credentials {
            login: "neo".to_string(),
            password: "wakeup123".to_string(),
        };

        svc.register(creds.clone()).await.unwrap();
        let user = svc.login(creds).await.unwrap();
        assert_eq!(user.login, "neo");
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let svc = service();
        svc.register(Credentials {
            login: "neo".to_string(),
            password: "wakeup123".to_string(),
        })
        .await
        .unwrap();

        let result = svc
            .login(Credentials {
                login: "neo".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_unknown_login_fails() {
        let svc = service();
        let result = svc
            .login(Credentials {
                login: "ghost".to_string(),
                password: "whatever".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let svc = service();
        let creds = Credentials {
            login: "neo".to_string(),
            password: "wakeup123".to_string(),
        };
        svc.register(creds.clone()).await.unwrap();

        let result = svc.register(creds).await;
        assert!(matches!(result, Err(UserError::LoginTaken(_))));
    }
}
