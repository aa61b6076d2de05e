//! Tests against a real PostgreSQL. Run with:
//!   DATABASE_URL=postgres://localhost/postgres cargo test -- --ignored

use lease_lock_service::backend::postgres::PostgresBackend;
use lease_lock_service::backend::LockBackend;
use std::sync::Arc;
use tokio::time::Duration;

async fn connect() -> PostgresBackend {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/postgres".to_string());
    let backend = PostgresBackend::connect(&url, 5)
        .await
        .expect("Failed to connect to Postgres");
    backend.init_schema().await.expect("Failed to create schema");
    backend
}

fn test_key(name: &str) -> String {
    format!("test:{}:{}", name, std::process::id())
}

#[tokio::test]
#[ignore = "needs a running Postgres; set DATABASE_URL"]
async fn lease_lifecycle() {
    let backend = connect().await;
    let key = test_key("lifecycle");

    assert!(backend.try_acquire(&key, 30).await.unwrap());
    assert!(!backend.try_acquire(&key, 30).await.unwrap());

    backend.release(&key).await.unwrap();
    assert!(backend.try_acquire(&key, 30).await.unwrap());

    backend.release(&key).await.unwrap();
}

#[tokio::test]
#[ignore = "needs a running Postgres; set DATABASE_URL"]
async fn expired_row_is_reclaimed() {
    let backend = connect().await;
    let key = test_key("expiry");

    assert!(backend.try_acquire(&key, 1).await.unwrap());
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(backend.try_acquire(&key, 30).await.unwrap());

    backend.release(&key).await.unwrap();
}

/// The affected-row semantics of the single upsert statement are what keeps
/// two simultaneous acquirers from both reporting success.
#[tokio::test]
#[ignore = "needs a running Postgres; set DATABASE_URL"]
async fn concurrent_acquire_has_single_winner() {
    let backend = Arc::new(connect().await);
    let key = test_key("race");

    let mut attempts = Vec::new();
    for _ in 0..16 {
        let backend = backend.clone();
        let key = key.clone();
        attempts.push(tokio::spawn(
            async move { backend.try_acquire(&key, 30).await },
        ));
    }

    let mut winners = 0;
    for attempt in attempts {
        if attempt.await.unwrap().unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);

    backend.release(&key).await.unwrap();
}

#[tokio::test]
#[ignore = "needs a running Postgres; set DATABASE_URL"]
async fn releasing_absent_key_is_idempotent() {
    let backend = connect().await;

    backend.release(&test_key("never-held")).await.unwrap();
}
