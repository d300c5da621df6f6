//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fetch_requests_total` (counter): fetch outcomes by `outcome`
//! - `fetch_request_duration_seconds` (histogram): end-to-end fetch latency
//! - `fetch_cache_lookups_total` (counter): cache lookups by `result`
//! - `fetch_retries_total` (counter): retry waits started
//! - `fetch_circuit_state` (gauge): 0=closed, 1=open, 2=half-open
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::circuit_breaker::CircuitState;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed fetch.
pub fn record_fetch(outcome: &'static str, start: Instant) {
    counter!("fetch_requests_total", "outcome" => outcome).increment(1);
    histogram!("fetch_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("fetch_cache_lookups_total", "result" => result).increment(1);
}

pub fn record_retry() {
    counter!("fetch_retries_total").increment(1);
}

pub fn record_circuit_state(state: CircuitState) {
    gauge!("fetch_circuit_state").set(state.as_gauge());
}
