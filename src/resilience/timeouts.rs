//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound a single transport attempt by a deadline
//! - Report expiry as a transient `FetchError::Timeout`
//!
//! # Design Decisions
//! - Only the guard's own wait is abandoned; the attempt future is dropped
//!   and whatever it would have produced is discarded
//! - The deadline is measured from `run` invocation, per attempt

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::fetch::error::{FetchError, FetchResult};
use crate::resilience::clock::Clock;

/// Deadline wrapper around one attempt.
#[derive(Debug, Clone)]
pub struct TimeoutGuard {
    deadline: Duration,
    clock: Arc<dyn Clock>,
}

impl TimeoutGuard {
    pub fn new(deadline: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { deadline, clock }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Run `operation`, yielding `FetchError::Timeout` if it does not resolve in time.
    pub async fn run<F, T>(&self, operation: F) -> FetchResult<T>
    where
        F: Future<Output = FetchResult<T>>,
    {
        tokio::select! {
            biased;
            result = operation => result,
            _ = self.clock.sleep(self.deadline) => {
                tracing::warn!(deadline = ?self.deadline, "Attempt timed out");
                Err(FetchError::Timeout(self.deadline))
            }
        }
    }
}
