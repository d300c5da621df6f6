//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init observability → Build transport → Build pipeline
//!
//! Shutdown (shutdown.rs):
//!     Trigger → child tokens cancelled → in-flight fetches return Cancelled
//!
//! Signals (signals.rs):
//!     Ctrl-C → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::StartupError;
