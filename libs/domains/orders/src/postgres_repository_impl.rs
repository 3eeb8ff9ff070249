use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DbBackend, FromQueryResult, Statement, TransactionTrait};
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{AddOrderOutcome, Balance, Order, OrderStatus, Withdrawal};
use crate::repository::OrderRepository;

/// PostgreSQL implementation of `OrderRepository` using SeaORM, mirroring
/// `domain_users::PostgresUserRepository`'s raw-statement style.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    db: sea_orm::DatabaseConnection,
}

impl PostgresOrderRepository {
    pub fn new(db: sea_orm::DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct OrderRow {
    id: Uuid,
    number: String,
    user_id: Uuid,
    status: String,
    accrual: i64,
    uploaded_date: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = OrderError;

    fn try_from(row: OrderRow) -> OrderResult<Order> {
        let status = OrderStatus::parse(&row.status)
            .ok_or_else(|| OrderError::Internal(format!("unknown order status '{}'", row.status)))?;
        Ok(Order {
            id: row.id,
            number: row.number,
            user_id: row.user_id,
            status,
            accrual: row.accrual,
            uploaded_date: row.uploaded_date,
        })
    }
}

#[derive(Debug, FromQueryResult)]
struct WithdrawalRow {
    id: Uuid,
    order_number: String,
    sum: i64,
    processed_date: chrono::DateTime<chrono::Utc>,
}

impl From<WithdrawalRow> for Withdrawal {
    fn from(row: WithdrawalRow) -> Self {
        Withdrawal {
            id: row.id,
            order_number: row.order_number,
            sum: row.sum,
            processed_date: row.processed_date,
        }
    }
}

fn internal(e: impl std::fmt::Display) -> OrderError {
    OrderError::Internal(format!("database error: {e}"))
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn list_new_orders(&self) -> OrderResult<Vec<Order>> {
        let sql = "SELECT * FROM orders WHERE status = 'NEW'";
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, Vec::<sea_orm::Value>::new());

        let rows = OrderRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(internal)?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn set_status(&self, number: &str, status: OrderStatus) -> OrderResult<()> {
        let sql = "UPDATE orders SET status = $1 WHERE number = $2";
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [status.as_str().into(), number.into()],
        );

        self.db.execute(stmt).await.map_err(internal)?;
        Ok(())
    }

    async fn apply_accrual(&self, number: &str, status: OrderStatus, accrual: i64) -> OrderResult<()> {
        let sql = "UPDATE orders SET status = $1, accrual = $2 WHERE number = $3";
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [status.as_str().into(), accrual.into(), number.into()],
        );

        self.db.execute(stmt).await.map_err(internal)?;
        Ok(())
    }

    async fn add_order_to_user(&self, user_id: Uuid, number: &str) -> OrderResult<AddOrderOutcome> {
        let existing = self.find_by_number(number).await?;
        if let Some(existing) = existing {
            return Ok(if existing.user_id == user_id {
                AddOrderOutcome::AlreadySubmittedBySameUser(existing)
            } else {
                AddOrderOutcome::ConflictOtherUser
            });
        }

        let order = Order::new(number.to_string(), user_id);
        let sql = r#"
            INSERT INTO orders (id, number, user_id, status, accrual, uploaded_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
        "#;
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                order.id.into(),
                order.number.clone().into(),
                order.user_id.into(),
                order.status.as_str().into(),
                order.accrual.into(),
                order.uploaded_date.into(),
            ],
        );

        match OrderRow::find_by_statement(stmt).one(&self.db).await {
            Ok(Some(row)) => Ok(AddOrderOutcome::Created(Order::try_from(row)?)),
            Ok(None) => Err(OrderError::Internal("failed to create order".to_string())),
            Err(e) if e.to_string().contains("duplicate key") || e.to_string().contains("unique constraint") => {
                // Lost the race against a concurrent insert of the same number.
                match self.find_by_number(number).await? {
                    Some(existing) if existing.user_id == user_id => {
                        Ok(AddOrderOutcome::AlreadySubmittedBySameUser(existing))
                    }
                    Some(_) => Ok(AddOrderOutcome::ConflictOtherUser),
                    None => Err(OrderError::Internal("order vanished after conflict".to_string())),
                }
            }
            Err(e) => Err(internal(e)),
        }
    }

    async fn get_orders_by_user(&self, user_id: Uuid) -> OrderResult<Vec<Order>> {
        let sql = "SELECT * FROM orders WHERE user_id = $1 ORDER BY uploaded_date ASC";
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [user_id.into()]);

        let rows = OrderRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(internal)?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn get_balance_by_user(&self, user_id: Uuid) -> OrderResult<Balance> {
        self.balance_in(&self.db, user_id).await
    }

    async fn add_withdraw(&self, user_id: Uuid, order_number: &str, sum: i64) -> OrderResult<Withdrawal> {
        let txn = self.db.begin().await.map_err(internal)?;

        let balance = self.balance_in(&txn, user_id).await?;
        if balance.current < sum {
            txn.rollback().await.map_err(internal)?;
            return Err(OrderError::InsufficientBalance {
                have: balance.current,
                requested: sum,
            });
        }

        let order_id = Uuid::now_v7();
        let uploaded = chrono::Utc::now();
        let insert_order = r#"
            INSERT INTO orders (id, number, user_id, status, accrual, uploaded_date)
            VALUES ($1, $2, $3, 'PROCESSED', 0, $4)
        "#;
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            insert_order,
            [order_id.into(), order_number.into(), user_id.into(), uploaded.into()],
        ))
        .await
        .map_err(internal)?;

        let withdrawal_id = Uuid::now_v7();
        let processed_date = chrono::Utc::now();
        let insert_withdraw = r#"
            INSERT INTO withdrawals (id, order_id, order_number, sum, processed_date)
            VALUES ($1, $2, $3, $4, $5)
        "#;
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            insert_withdraw,
            [
                withdrawal_id.into(),
                order_id.into(),
                order_number.into(),
                sum.into(),
                processed_date.into(),
            ],
        ))
        .await
        .map_err(internal)?;

        txn.commit().await.map_err(internal)?;

        Ok(Withdrawal {
            id: withdrawal_id,
            order_number: order_number.to_string(),
            sum,
            processed_date,
        })
    }

    async fn get_withdrawals_by_user(&self, user_id: Uuid) -> OrderResult<Vec<Withdrawal>> {
        let sql = r#"
            SELECT w.id, w.order_number, w.sum, w.processed_date
            FROM withdrawals w
            JOIN orders o ON o.id = w.order_id
            WHERE o.user_id = $1
            ORDER BY w.processed_date ASC
        "#;
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [user_id.into()]);

        let rows = WithdrawalRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(internal)?;

        Ok(rows.into_iter().map(Withdrawal::from).collect())
    }
}

impl PostgresOrderRepository {
    async fn find_by_number(&self, number: &str) -> OrderResult<Option<Order>> {
        let sql = "SELECT * FROM orders WHERE number = $1";
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [number.into()]);

        let row = OrderRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(internal)?;

        row.map(Order::try_from).transpose()
    }

    /// `current = Σ accrual(PROCESSED) - Σ withdrawals.sum`, `withdrawn = Σ withdrawals.sum`,
    /// both scoped to `user_id` and evaluated against whatever connection is
    /// passed in — a plain pool connection for reads, or the in-flight
    /// transaction when `add_withdraw` needs a consistent snapshot.
    async fn balance_in(&self, conn: &impl ConnectionTrait, user_id: Uuid) -> OrderResult<Balance> {
        #[derive(Debug, FromQueryResult)]
        struct BalanceRow {
            earned: Option<i64>,
            withdrawn: Option<i64>,
        }

        let sql = r#"
            SELECT
                (SELECT COALESCE(SUM(accrual), 0) FROM orders WHERE user_id = $1 AND status = 'PROCESSED') AS earned,
                (SELECT COALESCE(SUM(w.sum), 0) FROM withdrawals w JOIN orders o ON o.id = w.order_id WHERE o.user_id = $1) AS withdrawn
        "#;
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [user_id.into()]);

        let row = BalanceRow::find_by_statement(stmt)
            .one(conn)
            .await
            .map_err(internal)?
            .unwrap_or(BalanceRow { earned: Some(0), withdrawn: Some(0) });

        let earned = row.earned.unwrap_or(0);
        let withdrawn = row.withdrawn.unwrap_or(0);
        Ok(Balance {
            current: earned - withdrawn,
            withdrawn,
        })
    }
}
