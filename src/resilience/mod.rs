//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to upstream:
//!     → circuit_breaker.rs (admit or reject; record call outcome)
//!     → retries.rs (re-run transient failures with backoff.rs delays)
//!     → timeouts.rs (deadline per attempt)
//!     → transport
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - Breaker wraps retry, so it sees call outcomes, not attempts
//! - All waits go through clock.rs so tests control time

pub mod backoff;
pub mod circuit_breaker;
pub mod clock;
pub mod retries;
pub mod timeouts;

pub use circuit_breaker::{CircuitBreaker, CircuitSnapshot, CircuitState};
pub use clock::{Clock, ManualClock, SystemClock};
pub use retries::RetryPolicy;
pub use timeouts::TimeoutGuard;
