use std::future::Future;
use std::time::Duration;

/// Exponential backoff for calls to the upstream API.
///
/// `max_retries` does not count the initial attempt, so a policy with three
/// retries makes at most four calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
            backoff_multiplier: 2,
        }
    }

    /// Delay before retry number `retry` (0-indexed)
    pub fn backoff_duration(&self, retry: u32) -> Duration {
        let factor = self.backoff_multiplier.saturating_pow(retry);
        self.initial_backoff.saturating_mul(factor)
    }
}

pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// the policy is exhausted. The last error is returned in the latter cases.
pub async fn retry_with_policy<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                let backoff = policy.backoff_duration(attempt);
                tracing::warn!(
                    error = %e,
                    attempt = attempt + 1,
                    backoff_ms = backoff.as_millis() as u64,
                    "Retryable upstream failure, backing off"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
