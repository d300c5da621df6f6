//! Retry logic.
//!
//! # Responsibilities
//! - Re-invoke a timeout-guarded attempt on transient failure
//! - Wait `base^attempt` seconds between attempts
//! - Report exhaustion as a single transient outcome
//!
//! # Design Decisions
//! - Permanent failures return immediately; retries only mask transient ones
//! - No jitter, so the schedule is exact and testable
//! - No lock is held across the sequence; each call retries independently

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::fetch::error::{FetchError, FetchResult};
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::clock::Clock;

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_backoff_secs: u64,
    max_backoff: Duration,
    clock: Arc<dyn Clock>,
}

impl RetryPolicy {
    /// `max_attempts` counts every attempt, the first included.
    pub fn new(
        max_attempts: u32,
        base_backoff_secs: u64,
        max_backoff: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff_secs,
            max_backoff,
            clock,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before attempt `attempt + 1`.
    pub fn delay(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_backoff_secs, self.max_backoff)
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run out.
    ///
    /// `operation` receives the 1-based attempt number.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> FetchResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = FetchResult<T>>,
    {
        let mut attempt = 1;
        loop {
            let err = match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_transient() {
                return Err(err);
            }

            if attempt >= self.max_attempts {
                tracing::warn!(attempts = attempt, error = %err, "Retries exhausted");
                return Err(FetchError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.delay(attempt);
            tracing::warn!(attempt, delay = ?delay, error = %err, "Transient failure, retrying");
            metrics::record_retry();
            self.clock.sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::clock::ManualClock;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(max_attempts: u32, clock: &ManualClock) -> RetryPolicy {
        RetryPolicy::new(max_attempts, 2, Duration::from_secs(60), Arc::new(clock.clone()))
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let clock = ManualClock::new();
        let retry = policy(5, &clock);
        let calls = AtomicU32::new(0);

        let result = retry
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt <= 3 {
                        Err(FetchError::Network("refused".into()))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(4));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(
            clock.sleeps(),
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8)
            ]
        );
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let clock = ManualClock::new();
        let retry = policy(5, &clock);
        let calls = AtomicU32::new(0);

        let result: FetchResult<()> = retry
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FetchError::PermanentHttp { status: 404 }) }
            })
            .await;

        assert_eq!(result, Err(FetchError::PermanentHttp { status: 404 }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_exhaustion_wraps_last_error() {
        let clock = ManualClock::new();
        let retry = policy(3, &clock);
        let calls = AtomicU32::new(0);

        let result: FetchResult<()> = retry
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FetchError::Timeout(Duration::from_secs(30))) }
            })
            .await;

        assert_eq!(
            result,
            Err(FetchError::RetriesExhausted {
                attempts: 3,
                last: Box::new(FetchError::Timeout(Duration::from_secs(30))),
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // No wait after the final attempt.
        assert_eq!(clock.sleeps().len(), 2);
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let retry = policy(0, &ManualClock::new());
        assert_eq!(retry.max_attempts(), 1);
    }
}
