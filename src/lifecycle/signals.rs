//! OS signal handling.
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Ctrl-C triggers shutdown; a second Ctrl-C is left to the default handler
//!   once the listener task has exited

use crate::lifecycle::shutdown::Shutdown;

/// Spawn a task that triggers `shutdown` on Ctrl-C.
pub fn listen_for_ctrl_c(shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => {
                        tracing::info!("Shutdown signal received");
                        shutdown.trigger();
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
                }
            }
            _ = shutdown.triggered() => {}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listener_exits_on_shutdown() {
        let shutdown = Shutdown::new();
        let handle = listen_for_ctrl_c(shutdown.clone());
        shutdown.trigger();
        handle.await.unwrap();
    }
}
