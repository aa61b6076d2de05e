use crate::backend::LockBackend;
use crate::error::LockError;
use tokio::time::{sleep, Duration, Instant};

/// First delay after a contended attempt.
pub const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
/// Ceiling for the doubling delay. No jitter, never reset mid-wait.
pub const MAX_BACKOFF: Duration = Duration::from_secs(1);
/// Fixed pause between release attempts against a failing backend.
const RELEASE_RETRY_INTERVAL: Duration = Duration::from_secs(1);

fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}

/// Poll `try_acquire` until it succeeds or the wait budget runs out.
///
/// `max_wait` of zero means wait forever. The budget is checked at the top
/// of each iteration, so the actual elapsed time can overshoot `max_wait`
/// by up to one sleep interval. Transport errors abort the wait immediately;
/// only clean contention is retried.
pub async fn acquire_blocking(
    backend: &dyn LockBackend,
    key: &str,
    max_wait: Duration,
    lease_seconds: u64,
) -> Result<(), LockError> {
    let started = Instant::now();
    let mut backoff = INITIAL_BACKOFF;

    loop {
        if !max_wait.is_zero() && started.elapsed() > max_wait {
            return Err(LockError::MaxAttemptsExceeded);
        }

        if backend
            .try_acquire(key, lease_seconds)
            .await
            .map_err(LockError::Backend)?
        {
            return Ok(());
        }

        sleep(backoff).await;
        backoff = next_backoff(backoff);
    }
}

/// Release the key, retrying on every failure until the backend confirms.
///
/// Never returns an error; a permanently unreachable backend stalls the
/// caller indefinitely. Callers that cannot afford that use the backend's
/// single-shot `release` directly.
pub async fn release_with_retry(backend: &dyn LockBackend, key: &str) {
    loop {
        match backend.release(key).await {
            Ok(()) => return,
            Err(err) => {
                log::warn!(
                    "[RELEASE] Backend error for key {}, retrying in {:?}: {:#}",
                    key,
                    RELEASE_RETRY_INTERVAL,
                    err
                );
                sleep(RELEASE_RETRY_INTERVAL).await;
            }
        }
    }
}
