use crate::backend::LockBackend;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-process backend for local development and tests.
///
/// Holds only the expiry per key; the entry API keeps check-and-insert
/// atomic within a shard, which is the whole correctness story here.
pub struct MemoryBackend {
    leases: DashMap<String, DateTime<Utc>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            leases: DashMap::new(),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LockBackend for MemoryBackend {
    async fn try_acquire(&self, key: &str, lease_seconds: u64) -> Result<bool> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(lease_seconds as i64);

        match self.leases.entry(key.to_string()) {
            Entry::Occupied(mut held) => {
                if *held.get() <= now {
                    // Expired lease, reclaim it in place.
                    held.insert(expires_at);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(expires_at);
                Ok(true)
            }
        }
    }

    async fn release(&self, key: &str) -> Result<()> {
        self.leases.remove(key);
        Ok(())
    }

    async fn active_count(&self) -> Result<u64> {
        let now = Utc::now();
        Ok(self
            .leases
            .iter()
            .filter(|entry| *entry.value() > now)
            .count() as u64)
    }

    async fn cleanup_expired(&self) -> Result<()> {
        let before = self.leases.len();
        let now = Utc::now();
        self.leases.retain(|_, expires_at| *expires_at > now);
        let removed = before - self.leases.len();
        if removed > 0 {
            log::info!("[SWEEP] Removed {} expired leases", removed);
        }
        Ok(())
    }
}
