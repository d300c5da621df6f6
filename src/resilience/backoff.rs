//! Exponential backoff without jitter.

use std::time::Duration;

/// Delay to wait after failed attempt number `attempt` (1-based).
///
/// `base_secs ^ attempt` seconds, capped at `max`. Attempt 0 never waits.
pub fn calculate_backoff(attempt: u32, base_secs: u64, max: Duration) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let delay_secs = base_secs.saturating_pow(attempt);
    Duration::from_secs(delay_secs).min(max)
}
