//! Circuit breaker for the upstream endpoint.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: endpoint assumed down, calls fail fast
//! - Half-Open: one trial call tests recovery
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive transient failures >= threshold
//! Open → Half-Open: first call after the cooldown
//! Half-Open → Closed: trial call reaches the endpoint
//! Half-Open → Open: trial call fails transiently
//! ```
//!
//! # Design Decisions
//! - Counts call outcomes, never individual retry attempts
//! - Fail fast in Open state (no waiting)
//! - Single trial in Half-Open; concurrent callers are rejected as if Open
//! - Cooldown is fixed once entered; nothing shortens or extends it
//! - A dropped call releases its trial slot without counting a failure

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::fetch::error::{ErrorKind, FetchError, FetchResult};
use crate::observability::metrics;
use crate::resilience::clock::Clock;

/// Breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    /// Numeric encoding for the state gauge.
    pub fn as_gauge(self) -> f64 {
        match self {
            CircuitState::Closed => 0.0,
            CircuitState::Open => 1.0,
            CircuitState::HalfOpen => 2.0,
        }
    }
}

/// Point-in-time view of the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitSnapshot {
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub opened_at: Option<Instant>,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Call-level circuit breaker guarding a single endpoint.
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_threshold: u32,
    cooldown: Duration,
    clock: Arc<dyn Clock>,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, cooldown: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            cooldown,
            clock,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    pub fn snapshot(&self) -> CircuitSnapshot {
        let inner = self.lock();
        CircuitSnapshot {
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
            opened_at: inner.opened_at,
        }
    }

    /// Run `operation` if the breaker admits it, recording its outcome.
    pub async fn call<F, Fut, T>(&self, operation: F) -> FetchResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult<T>>,
    {
        let permit = self.acquire()?;
        let result = operation().await;
        permit.settle(result.as_ref().err().map(FetchError::kind));
        result
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self) -> FetchResult<CallPermit<'_>> {
        let mut inner = self.lock();
        let state = inner.state;
        match state {
            CircuitState::Closed => Ok(CallPermit::new(self, false)),
            CircuitState::Open => {
                let now = self.clock.now();
                let elapsed = inner
                    .opened_at
                    .map(|opened| now.saturating_duration_since(opened))
                    .unwrap_or(self.cooldown);
                if elapsed < self.cooldown {
                    return Err(FetchError::CircuitOpen {
                        retry_after: self.cooldown - elapsed,
                    });
                }
                self.transition(&mut inner, CircuitState::HalfOpen);
                inner.trial_in_flight = true;
                Ok(CallPermit::new(self, true))
            }
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    return Err(FetchError::CircuitOpen {
                        retry_after: Duration::ZERO,
                    });
                }
                inner.trial_in_flight = true;
                Ok(CallPermit::new(self, true))
            }
        }
    }

    /// `failure` is `None` for success.
    fn record(&self, trial: bool, failure: Option<ErrorKind>) {
        let mut inner = self.lock();
        if trial {
            inner.trial_in_flight = false;
        }

        match failure {
            None => {
                inner.consecutive_failures = 0;
                if trial {
                    self.transition(&mut inner, CircuitState::Closed);
                }
            }
            Some(ErrorKind::Transient) => {
                inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
                let crossed = inner.state == CircuitState::Closed
                    && inner.consecutive_failures >= self.failure_threshold;
                if trial || crossed {
                    self.open(&mut inner);
                }
            }
            Some(ErrorKind::Permanent) => {
                // The endpoint answered, so a trial proves it is reachable.
                if trial {
                    inner.consecutive_failures = 0;
                    self.transition(&mut inner, CircuitState::Closed);
                }
            }
            Some(ErrorKind::Cancelled) | Some(ErrorKind::CircuitOpen) => {}
        }
    }

    /// Give back a trial slot whose call never completed.
    fn release(&self, trial: bool) {
        if trial {
            let mut inner = self.lock();
            inner.trial_in_flight = false;
            tracing::debug!("Half-open trial abandoned, slot released");
        }
    }

    fn open(&self, inner: &mut BreakerState) {
        inner.opened_at = Some(self.clock.now());
        self.transition(inner, CircuitState::Open);
    }

    fn transition(&self, inner: &mut BreakerState, to: CircuitState) {
        let from = inner.state;
        if from == to {
            return;
        }
        inner.state = to;
        if to == CircuitState::Closed {
            inner.opened_at = None;
        }
        metrics::record_circuit_state(to);
        match to {
            CircuitState::Open => tracing::warn!(
                from = ?from,
                consecutive_failures = inner.consecutive_failures,
                cooldown = ?self.cooldown,
                "Circuit opened"
            ),
            _ => tracing::info!(from = ?from, to = ?to, "Circuit state changed"),
        }
    }
}

/// Admission ticket for one call. Dropping it unsettled releases the trial slot.
struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl<'a> CallPermit<'a> {
    fn new(breaker: &'a CircuitBreaker, trial: bool) -> Self {
        Self {
            breaker,
            trial,
            settled: false,
        }
    }

    fn settle(mut self, failure: Option<ErrorKind>) {
        self.settled = true;
        self.breaker.record(self.trial, failure);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.release(self.trial);
        }
    }
}
