use thiserror::Error;

/// Failure modes of the lock client surface.
///
/// Contention is not an error: a clean "already held" outcome is reported
/// as `Ok(false)` by the non-blocking probe and absorbed by the blocking
/// acquire's retry loop.
#[derive(Debug, Error)]
pub enum LockError {
    /// A blocking acquire ran out of its wait budget while the key stayed
    /// held. Distinct from `Backend` so callers can extend the wait instead
    /// of treating the store as down.
    #[error("max lock attempts exceeded")]
    MaxAttemptsExceeded,

    /// The store or database was unreachable or returned a protocol-level
    /// error. Never retried by the acquire path.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl LockError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LockError::MaxAttemptsExceeded)
    }
}
