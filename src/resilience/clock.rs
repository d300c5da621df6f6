//! Time source for every time-dependent component.
//!
//! # Responsibilities
//! - Supply monotonic "now" for cache expiry and breaker cooldown
//! - Supply the delay primitive used by backoff and timeout waits
//!
//! # Design Decisions
//! - Injected as `Arc<dyn Clock>`; nothing reads the wall clock directly
//! - `ManualClock` sleeps yield once, then complete and advance virtual time

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::Poll;
use std::time::{Duration, Instant};

use futures_util::future::{self, BoxFuture};

/// Monotonic time plus an async delay.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current monotonic time.
    fn now(&self) -> Instant;

    /// Wait for `duration`.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Real time backed by Tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

#[derive(Debug)]
struct ManualState {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

/// Virtual clock for deterministic tests.
///
/// Time only moves when [`ManualClock::advance`] is called or when a
/// [`Clock::sleep`] future completes. A sleep returns `Pending` on its first
/// poll and completes on the next one, so in a biased `select!` an operation
/// that needs one extra wakeup still beats the deadline, while one that is
/// still pending after that loses to it. Completed sleeps are recorded so
/// callers can inspect the exact delay schedule.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Arc::new(Mutex::new(ManualState {
                elapsed: Duration::ZERO,
                sleeps: Vec::new(),
            })),
        }
    }

    /// Move virtual time forward.
    pub fn advance(&self, duration: Duration) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.elapsed += duration;
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed
    }

    /// Every delay that has been slept through, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sleeps
            .clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        let state = self.state.clone();
        let mut yielded = false;
        Box::pin(future::poll_fn(move |cx| {
            if !yielded {
                yielded = true;
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            state.elapsed += duration;
            state.sleeps.push(duration);
            Poll::Ready(())
        }))
    }
}
