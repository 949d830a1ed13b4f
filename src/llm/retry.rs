// src/llm/retry.rs
// Bounded retry for transient provider failures

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use super::ProviderError;

/// Hard ceiling on retries; a triage request gets at most one second chance
pub const MAX_RETRIES_CAP: u32 = 1;
/// Default number of retries for transient failures
const DEFAULT_MAX_RETRIES: u32 = 1;
/// Default backoff before the retry (doubles on each further attempt)
const DEFAULT_BASE_BACKOFF_MS: u64 = 500;

/// Retry policy applied around a provider call.
///
/// Only `Unavailable` and `RateLimited` are retried. Everything else is
/// returned to the caller on the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff: Duration::from_millis(DEFAULT_BASE_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    /// Create a policy, clamping `max_retries` to `MAX_RETRIES_CAP`
    pub fn new(max_retries: u32, base_backoff: Duration) -> Self {
        Self {
            max_retries: max_retries.min(MAX_RETRIES_CAP),
            base_backoff,
        }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out.
    ///
    /// `op` receives the zero-based attempt number.
    pub async fn run<T, F, Fut>(&self, request_id: &str, mut op: F) -> Result<T, ProviderError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;
        let mut backoff = self.base_backoff;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    warn!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Transient provider error, retrying in {:?}...",
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                    backoff *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
