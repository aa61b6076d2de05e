use crate::backend::memory::MemoryBackend;
use crate::backend::postgres::PostgresBackend;
use crate::backend::redis::RedisBackend;
use crate::backend::LockBackend;
use crate::error::LockError;
use crate::retry;
use anyhow::Result;
use std::sync::Arc;
use tokio::time::Duration;

/// Process-external mutual exclusion over any [`LockBackend`].
///
/// Locks from different backends never see each other; a Redis lock and a
/// Postgres lock with the same key are independent. The store is the sole
/// source of truth — the client holds no lock state between calls.
#[derive(Clone)]
pub struct LockClient {
    backend: Arc<dyn LockBackend>,
}

impl LockClient {
    pub fn new(backend: Arc<dyn LockBackend>) -> Self {
        Self { backend }
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub async fn redis(
        redis_url: &str,
        username: Option<String>,
        password: Option<String>,
        db: Option<i64>,
    ) -> Result<Self> {
        let backend = RedisBackend::connect(redis_url, username, password, db).await?;
        Ok(Self::new(Arc::new(backend)))
    }

    pub async fn postgres(database_url: &str, max_connections: u32) -> Result<Self> {
        let backend = PostgresBackend::connect(database_url, max_connections).await?;
        backend.init_schema().await?;
        Ok(Self::new(Arc::new(backend)))
    }

    pub fn backend(&self) -> Arc<dyn LockBackend> {
        self.backend.clone()
    }

    /// Probe for the lease without waiting.
    ///
    /// `Ok(false)` means someone else still holds it — not an error.
    pub async fn try_acquire(&self, key: &str, lease_seconds: u64) -> Result<bool, LockError> {
        self.backend
            .try_acquire(key, lease_seconds)
            .await
            .map_err(LockError::Backend)
    }

    /// Block until the lease is taken, the wait budget runs out
    /// (`LockError::MaxAttemptsExceeded`) or the backend fails.
    ///
    /// `max_wait` of zero waits forever. The wait is a plain future, so a
    /// caller inside a cancellable workflow drops it to stop early.
    pub async fn acquire_blocking(
        &self,
        key: &str,
        max_wait: Duration,
        lease_seconds: u64,
    ) -> Result<(), LockError> {
        retry::acquire_blocking(self.backend.as_ref(), key, max_wait, lease_seconds).await
    }

    /// Release the lease, retrying every second until the backend confirms.
    ///
    /// Failures are absorbed; an unreachable backend blocks the caller until
    /// it comes back.
    pub async fn release(&self, key: &str) {
        retry::release_with_retry(self.backend.as_ref(), key).await;
    }

    /// Single release attempt, surfacing the backend error instead of
    /// blocking on retries.
    pub async fn release_once(&self, key: &str) -> Result<(), LockError> {
        self.backend
            .release(key)
            .await
            .map_err(LockError::Backend)
    }
}
