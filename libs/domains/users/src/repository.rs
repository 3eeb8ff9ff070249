use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for account persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> UserResult<User>;
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;
    async fn get_by_login(&self, login: &str) -> UserResult<Option<User>>;
}

/// In-memory implementation (development/testing).
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        let login_taken = users.values().any(|u| u.login == user.login);
        if login_taken {
            return Err(UserError::LoginTaken(user.login));
        }

        users.insert(user.id, user.clone());
        tracing::info!(user_id = %user.id, login = %user.login, "registered user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_login(&self, login: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.login == login).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_get_user() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("neo".to_string(), "hashed".to_string());

        let created = repo.create(user.clone()).await.unwrap();
        assert_eq!(created.login, "neo");

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn get_by_login() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("neo".to_string(), "hashed".to_string()))
            .await
            .unwrap();

        assert!(repo.get_by_login("neo").await.unwrap().is_some());
        assert!(repo.get_by_login("trinity").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_login_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("neo".to_string(), "hash1".to_string()))
            .await
            .unwrap();

        let result = repo
            .create(User::new("neo".to_string(), "hash2".to_string()))
            .await;
        assert!(matches!(result, Err(UserError::LoginTaken(_))));
    }
}
