//! Resilient, caching HTTP fetch library.
//!
//! Callers go through [`FetchPipeline::fetch`], which layers a TTL response
//! cache, a circuit breaker, bounded retry with exponential backoff and a
//! per-attempt timeout over a single HTTP transport.

pub mod cache;
pub mod config;
pub mod fetch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::AppConfig;
pub use fetch::{ErrorKind, FetchError, FetchPipeline};
pub use http::Response;
pub use lifecycle::Shutdown;
