use crate::backend::LockBackend;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// A fresh insert takes the lease; on collision the update only lands when
/// the existing row has already expired. Success is exactly one affected
/// row either way. A read-then-write sequence here would race.
const ACQUIRE_SQL: &str = "INSERT INTO locks (key, expires_at) \
     VALUES ($1, NOW() + INTERVAL '1 second' * $2) \
     ON CONFLICT (key) DO UPDATE SET expires_at = EXCLUDED.expires_at \
     WHERE locks.expires_at < NOW()";

const RELEASE_SQL: &str = "DELETE FROM locks WHERE key = $1";

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS locks (\
     key TEXT PRIMARY KEY, \
     expires_at TIMESTAMPTZ NOT NULL)";

pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    /// Wrap an existing pool, shared with ordinary application traffic.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the locks table when it is missing.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// The underlying pool, for statements outside the lock surface.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LockBackend for PostgresBackend {
    async fn try_acquire(&self, key: &str, lease_seconds: u64) -> Result<bool> {
        let result = sqlx::query(ACQUIRE_SQL)
            .bind(key)
            .bind(lease_seconds as f64)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn release(&self, key: &str) -> Result<()> {
        sqlx::query(RELEASE_SQL).bind(key).execute(&self.pool).await?;
        Ok(())
    }

    async fn active_count(&self) -> Result<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM locks WHERE expires_at > NOW()")
                .fetch_one(&self.pool)
                .await?;
        Ok(count as u64)
    }

    async fn cleanup_expired(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM locks WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            log::info!("[SWEEP] Removed {} expired leases", result.rows_affected());
        }
        Ok(())
    }
}
