use crate::backend::LockBackend;
use anyhow::Result;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::str::FromStr;

pub struct RedisBackend {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisBackend {
    pub async fn connect(
        redis_url: &str,
        username: Option<String>,
        password: Option<String>,
        db: Option<i64>,
    ) -> Result<Self> {
        let mut connection_info = redis::ConnectionInfo::from_str(redis_url)?;

        if let Some(pwd) = password {
            connection_info.redis.password = Some(pwd);
        }
        if let Some(user) = username {
            connection_info.redis.username = Some(user);
        }
        if let Some(database) = db {
            connection_info.redis.db = database;
        }

        let client = redis::Client::open(connection_info)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            prefix: "lock:".to_string(),
        })
    }

    fn lock_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// GET + deserialize. An absent key yields `None` rather than an error.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.conn.clone();
        let data: Option<String> = conn.get(key).await?;

        match data {
            Some(json_str) => Ok(Some(serde_json::from_str(&json_str)?)),
            None => Ok(None),
        }
    }

    /// Serialize + SET, no expiry.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut conn = self.conn.clone();
        let serialized = serde_json::to_string(value)?;
        let _: () = conn.set(key, serialized).await?;
        Ok(())
    }

    /// Run a single raw command and return the reply as a string.
    pub async fn query(&self, cmd: &str, args: &[&str]) -> Result<String> {
        let mut conn = self.conn.clone();
        let mut command = redis::cmd(cmd);
        for arg in args {
            command.arg(*arg);
        }
        Ok(command.query_async(&mut conn).await?)
    }

    /// Run a single raw command, discarding the reply.
    pub async fn execute(&self, cmd: &str, args: &[&str]) -> Result<()> {
        let mut conn = self.conn.clone();
        let mut command = redis::cmd(cmd);
        for arg in args {
            command.arg(*arg);
        }
        let _: () = command.query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl LockBackend for RedisBackend {
    async fn try_acquire(&self, key: &str, lease_seconds: u64) -> Result<bool> {
        let lock_key = self.lock_key(key);
        let mut conn = self.conn.clone();

        // One SET NX EX command; the create and the expiry must land together.
        let reply: Option<String> = redis::cmd("SET")
            .arg(&lock_key)
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(lease_seconds)
            .query_async(&mut conn)
            .await?;

        Ok(reply.as_deref() == Some("OK"))
    }

    async fn release(&self, key: &str) -> Result<()> {
        let lock_key = self.lock_key(key);
        let mut conn = self.conn.clone();

        // DEL of an absent key replies 0, which is still a success here.
        let _: () = conn.del(&lock_key).await?;
        Ok(())
    }

    async fn active_count(&self) -> Result<u64> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", self.prefix);

        let mut count = 0u64;
        let mut iter = conn.scan_match::<_, String>(&pattern).await?;
        while iter.next_item().await.is_some() {
            count += 1;
        }
        Ok(count)
    }

    async fn cleanup_expired(&self) -> Result<()> {
        // Redis expires the keys itself, nothing to sweep.
        Ok(())
    }
}
