//! Exponential backoff wrappers for store and cache operations.
//!
//! Every round-trip to an external collaborator goes through one of two
//! variants with different exhaustion behavior:
//!
//! * [`retry_cache`] is best effort. An exhausted budget yields `None`,
//!   which callers must treat exactly like a cache miss.
//! * [`retry_store`] is authoritative. An exhausted budget logs the failure
//!   and returns the last error to the caller.
//!
//! Only the calling task is suspended during backoff; concurrent workers
//! are unaffected.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::{CacheError, StoreError};

/// Upper bound (exclusive) of the uniform jitter added to every delay.
const JITTER_MAX: Duration = Duration::from_millis(100);

/// Attempt budget and base delay for a retried operation.
///
/// `max_retries` is the total number of attempts. A budget of `0` performs
/// no attempts at all, so the best-effort variant degrades to an immediate
/// miss. Callers must request retries explicitly.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Backoff delay for a 0-indexed failed attempt:
    /// `base_delay * 2^attempt + uniform(0, 100ms)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let backoff = self.base_delay * 2u32.saturating_pow(attempt);
        let jitter = rand::rng().random_range(Duration::ZERO..JITTER_MAX);
        backoff + jitter
    }
}

impl Default for RetryPolicy {
    /// No retries unless explicitly requested, 100 ms base delay.
    fn default() -> Self {
        Self::new(0, Duration::from_millis(100))
    }
}

/// Run a cache operation with backoff, degrading exhaustion to a miss.
pub async fn retry_cache<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CacheError>>,
{
    for attempt in 0..policy.max_retries {
        match operation().await {
            Ok(value) => return Some(value),
            Err(err) => {
                tracing::debug!(attempt, error = %err, "cache operation failed");
                tokio::time::sleep(policy.delay_for(attempt)).await;
            }
        }
    }
    None
}

/// Run a durable-store operation with backoff, surfacing exhaustion.
///
/// The final failed attempt is logged at error level and returned without
/// an extra backoff sleep.
pub async fn retry_store<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut last_error = StoreError::Backend("retry budget of zero attempts".into());
    for attempt in 0..policy.max_retries {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt + 1 < policy.max_retries {
                    tracing::debug!(attempt, error = %err, "store operation failed, backing off");
                    tokio::time::sleep(policy.delay_for(attempt)).await;
                } else {
                    tracing::error!(
                        attempts = policy.max_retries,
                        error = %err,
                        "store operation failed after exhausting retries"
                    );
                }
                last_error = err;
            }
        }
    }
    Err(last_error)
}
