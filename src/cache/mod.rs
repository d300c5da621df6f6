//! Response caching subsystem.
//!
//! # Data Flow
//! ```text
//! fetch(uri)
//!     → store.rs get(key): hit returns immediately
//!     → miss runs the breaker/retry/timeout chain
//!     → success only: store.rs put(key, response, ttl)
//! ```
//!
//! # Design Decisions
//! - In-memory, process lifetime; nothing persisted
//! - Expiry checked lazily at read time, no background sweeper
//! - Sharded map, so readers and writers of different keys never contend

pub mod store;

pub use store::ResponseCache;
