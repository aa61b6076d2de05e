pub mod memory;
pub mod postgres;
pub mod redis;

use anyhow::Result;
use async_trait::async_trait;

/// Capability interface over the store that holds the locks.
///
/// Implementations must guarantee that under concurrent `try_acquire` calls
/// for the same key, at most one call observes `true` until the lease expires
/// or `release` runs. That contract rests entirely on the atomicity of the
/// single underlying store operation, never on client-side coordination.
#[async_trait]
pub trait LockBackend: Send + Sync {
    /// Attempt to take the lease without waiting.
    ///
    /// `Ok(false)` means the key is still leased by someone else; transport
    /// and protocol failures come back as errors.
    async fn try_acquire(&self, key: &str, lease_seconds: u64) -> Result<bool>;

    /// Drop the lease. Releasing an absent key is a success.
    async fn release(&self, key: &str) -> Result<()>;

    /// Number of currently live leases, for the usage sampler.
    async fn active_count(&self) -> Result<u64>;

    /// Remove leases whose expiry has passed. Lazy expiry in `try_acquire`
    /// never depends on this running.
    async fn cleanup_expired(&self) -> Result<()>;
}
