use super::{User, UserError, UserRepository, UserResult};
use async_trait::async_trait;
use sea_orm::{DbBackend, FromQueryResult, Statement};
use uuid::Uuid;

/// PostgreSQL implementation of `UserRepository` using SeaORM.
#[derive(Clone)]
pub struct PostgresUserRepository {
    db: sea_orm::DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: sea_orm::DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: Uuid,
    login: String,
    password_hash: String,
    registration_date: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            login: row.login,
            password_hash: row.password_hash,
            registration_date: row.registration_date,
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let sql = r#"
            INSERT INTO users (id, login, password_hash, registration_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                user.id.into(),
                user.login.clone().into(),
                user.password_hash.clone().into(),
                user.registration_date.into(),
            ],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("duplicate key") || err_str.contains("unique constraint") {
                    UserError::LoginTaken(user.login.clone())
                } else {
                    UserError::Internal(format!("database error: {e}"))
                }
            })?
            .ok_or_else(|| UserError::Internal("failed to create user".to_string()))?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let sql = "SELECT * FROM users WHERE id = $1";
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("database error: {e}")))?;

        Ok(row.map(|r| r.into()))
    }

    async fn get_by_login(&self, login: &str) -> UserResult<Option<User>> {
        let sql = "SELECT * FROM users WHERE login = $1";
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [login.into()]);

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("database error: {e}")))?;

        Ok(row.map(|r| r.into()))
    }
}
