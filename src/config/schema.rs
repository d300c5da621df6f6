//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Endpoint the demo loop queries.
    pub target: TargetConfig,

    /// Cache, retry, timeout and breaker policy.
    pub fetch: FetchConfig,

    /// HTTP client settings.
    pub transport: TransportConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Target endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Absolute URI fetched on every iteration.
    pub url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: "https://api.open-meteo.com/v1/forecast?latitude=52.52&longitude=13.41&current_weather=true"
                .to_string(),
        }
    }
}

/// Resilience policy for the fetch pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Lifetime of a cached successful response in seconds.
    pub cache_ttl_secs: u64,

    /// Maximum number of attempts per call, the first included.
    pub max_retries: u32,

    /// Base of the exponential backoff; wait is `base^attempt` seconds.
    pub base_backoff_secs: u64,

    /// Upper bound for a single backoff wait in seconds.
    pub max_backoff_secs: u64,

    /// Deadline for one transport attempt in seconds.
    pub per_attempt_timeout_secs: u64,

    /// Consecutive failed calls that open the circuit.
    /// Defaults to twice `max_retries` when unset.
    pub circuit_failure_threshold: Option<u32>,

    /// How long the circuit stays open before a trial call in seconds.
    pub circuit_cooldown_secs: u64,

    /// Status codes treated as transient instead of permanent (e.g. 502, 503, 504).
    pub retryable_statuses: Vec<u16>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 30,
            max_retries: 5,
            base_backoff_secs: 2,
            max_backoff_secs: 60,
            per_attempt_timeout_secs: 30,
            circuit_failure_threshold: None,
            circuit_cooldown_secs: 30,
            retryable_statuses: Vec::new(),
        }
    }
}

impl FetchConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }

    pub fn per_attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.per_attempt_timeout_secs)
    }

    pub fn circuit_cooldown(&self) -> Duration {
        Duration::from_secs(self.circuit_cooldown_secs)
    }

    /// Effective breaker threshold.
    pub fn failure_threshold(&self) -> u32 {
        self.circuit_failure_threshold
            .unwrap_or_else(|| self.max_retries.saturating_mul(2))
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// How long idle pooled connections are kept in seconds.
    pub pool_idle_timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("weather-fetch/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 5,
            pool_idle_timeout_secs: 90,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
