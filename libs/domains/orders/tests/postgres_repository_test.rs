//! Integration tests for `PostgresOrderRepository`.
//!
//! These run against a real PostgreSQL instance via testcontainers, the same
//! convention used elsewhere in this workspace's domain crates.

use domain_orders::{AddOrderOutcome, OrderRepository, OrderStatus, PostgresOrderRepository};
use sea_orm::ConnectionTrait;
use test_utils::TestDatabase;
use uuid::Uuid;

async fn seed_user(db: &sea_orm::DatabaseConnection, login: &str) -> Uuid {
    let id = Uuid::now_v7();
    db.execute(sea_orm::Statement::from_sql_and_values(
        sea_orm::DbBackend::Postgres,
        "INSERT INTO users (id, login, password_hash) VALUES ($1, $2, 'hash')",
        [id.into(), login.into()],
    ))
    .await
    .expect("failed to seed user");
    id
}

#[tokio::test]
async fn add_order_then_list_new_orders_round_trips() {
    let db = TestDatabase::new().await;
    let conn = db.connection();
    let user_id = seed_user(&conn, "alice").await;
    let repo = PostgresOrderRepository::new(conn);

    let outcome = repo.add_order_to_user(user_id, "3086248659").await.unwrap();
    assert!(matches!(outcome, AddOrderOutcome::Created(_)));

    let new_orders = repo.list_new_orders().await.unwrap();
    assert_eq!(new_orders.len(), 1);
    assert_eq!(new_orders[0].number, "3086248659");
    assert_eq!(new_orders[0].status, OrderStatus::New);
}

#[tokio::test]
async fn add_order_twice_by_same_user_is_idempotent() {
    let db = TestDatabase::new().await;
    let conn = db.connection();
    let user_id = seed_user(&conn, "bob").await;
    let repo = PostgresOrderRepository::new(conn);

    repo.add_order_to_user(user_id, "12345678903").await.unwrap();
    let second = repo.add_order_to_user(user_id, "12345678903").await.unwrap();

    assert!(matches!(second, AddOrderOutcome::AlreadySubmittedBySameUser(_)));
}

#[tokio::test]
async fn add_order_by_another_user_conflicts() {
    let db = TestDatabase::new().await;
    let conn = db.connection();
    let user_a = seed_user(&conn, "carol").await;
    let user_b = seed_user(&conn, "dave").await;
    let repo = PostgresOrderRepository::new(conn);

    repo.add_order_to_user(user_a, "79927398713").await.unwrap();
    let conflict = repo.add_order_to_user(user_b, "79927398713").await.unwrap();

    assert!(matches!(conflict, AddOrderOutcome::ConflictOtherUser));
}

#[tokio::test]
async fn apply_accrual_then_balance_reflects_processed_orders() {
    let db = TestDatabase::new().await;
    let conn = db.connection();
    let user_id = seed_user(&conn, "erin").await;
    let repo = PostgresOrderRepository::new(conn);

    repo.add_order_to_user(user_id, "3086248659").await.unwrap();
    repo.apply_accrual("3086248659", OrderStatus::Processed, 70000)
        .await
        .unwrap();

    let balance = repo.get_balance_by_user(user_id).await.unwrap();
    assert_eq!(balance.current, 70000);
    assert_eq!(balance.withdrawn, 0);
}

#[tokio::test]
async fn withdraw_against_balance_creates_order_and_withdrawal_row() {
    let db = TestDatabase::new().await;
    let conn = db.connection();
    let user_id = seed_user(&conn, "frank").await;
    let repo = PostgresOrderRepository::new(conn);

    repo.add_order_to_user(user_id, "3086248659").await.unwrap();
    repo.apply_accrual("3086248659", OrderStatus::Processed, 10000)
        .await
        .unwrap();

    repo.add_withdraw(user_id, "79927398713", 3000).await.unwrap();

    let balance = repo.get_balance_by_user(user_id).await.unwrap();
    assert_eq!(balance.current, 7000);
    assert_eq!(balance.withdrawn, 3000);

    let withdrawals = repo.get_withdrawals_by_user(user_id).await.unwrap();
    assert_eq!(withdrawals.len(), 1);
    assert_eq!(withdrawals[0].sum, 3000);
}

#[tokio::test]
async fn withdraw_beyond_balance_is_rejected() {
    let db = TestDatabase::new().await;
    let conn = db.connection();
    let user_id = seed_user(&conn, "grace").await;
    let repo = PostgresOrderRepository::new(conn);

    repo.add_order_to_user(user_id, "3086248659").await.unwrap();
    repo.apply_accrual("3086248659", OrderStatus::Processed, 1000)
        .await
        .unwrap();

    let result = repo.add_withdraw(user_id, "79927398713", 5000).await;
    assert!(result.is_err());
}
