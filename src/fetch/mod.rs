//! Fetch subsystem.
//!
//! # Data Flow
//! ```text
//! fetch(uri)
//!     → http::request (parse, canonical cache key)
//!     → cache (hit: return)
//!     → resilience::circuit_breaker
//!         → resilience::retries
//!             → resilience::timeouts
//!                 → http::transport
//!     → classify status, cache successes
//! ```
//!
//! # Design Decisions
//! - Every layer returns `FetchResult`; no failure goes unclassified
//! - One pipeline per upstream endpoint, shared by reference across callers

pub mod error;
pub mod pipeline;

pub use error::{ErrorKind, FetchError, FetchResult};
pub use pipeline::FetchPipeline;
