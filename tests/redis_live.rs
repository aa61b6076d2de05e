//! Tests against a real Redis. Run with:
//!   REDIS_URL=redis://127.0.0.1:6379 cargo test -- --ignored

use lease_lock_service::backend::redis::RedisBackend;
use lease_lock_service::backend::LockBackend;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

async fn connect() -> RedisBackend {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    RedisBackend::connect(&url, None, None, None)
        .await
        .expect("Failed to connect to Redis")
}

fn test_key(name: &str) -> String {
    format!("test:{}:{}", name, std::process::id())
}

#[tokio::test]
#[ignore = "needs a running Redis; set REDIS_URL"]
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
#[ignore = "needs a running Redis; set REDIS_URL"]
async fn lease_expires_without_release() {
    let backend = connect().await;
    let key = test_key("expiry");

    assert!(backend.try_acquire(&key, 1).await.unwrap());
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(backend.try_acquire(&key, 30).await.unwrap());

    backend.release(&key).await.unwrap();
}

#[tokio::test]
#[ignore = "needs a running Redis; set REDIS_URL"]
async fn releasing_absent_key_is_idempotent() {
    let backend = connect().await;

    backend.release(&test_key("never-held")).await.unwrap();
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Sample {
    id: u32,
    name: String,
}

#[tokio::test]
#[ignore = "needs a running Redis; set REDIS_URL"]
async fn json_helpers_store_and_load() {
    let backend = connect().await;
    let key = test_key("json");

    assert_eq!(backend.get_json::<Sample>(&key).await.unwrap(), None);

    let value = Sample {
        id: 7,
        name: "maintenance".to_string(),
    };
    backend.set_json(&key, &value).await.unwrap();
    assert_eq!(backend.get_json::<Sample>(&key).await.unwrap(), Some(value));

    backend.execute("DEL", &[&key]).await.unwrap();
}
