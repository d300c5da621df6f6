//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline components produce:
//!     → logging.rs (structured log events, one span per fetch)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (UUID v4) on every fetch span
//! - Metrics are cheap and no-ops without an installed recorder

pub mod logging;
pub mod metrics;
