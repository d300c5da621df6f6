//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts, timeouts, thresholds > 0)
//! - Check the target URI and status lists
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("fetch.base_backoff_secs must be at least 1")]
    BackoffBase,

    #[error("fetch.max_backoff_secs ({max}) is below fetch.base_backoff_secs ({base})")]
    BackoffCap { base: u64, max: u64 },

    #[error("target.url '{url}' is invalid: {reason}")]
    TargetUrl { url: String, reason: String },

    #[error("fetch.retryable_statuses contains {0}, which is not a retryable HTTP status")]
    Status(u16),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let fetch = &config.fetch;

    if fetch.max_retries == 0 {
        errors.push(ValidationError::Zero { field: "fetch.max_retries" });
    }
    if fetch.base_backoff_secs == 0 {
        errors.push(ValidationError::BackoffBase);
    } else if fetch.max_backoff_secs < fetch.base_backoff_secs {
        errors.push(ValidationError::BackoffCap {
            base: fetch.base_backoff_secs,
            max: fetch.max_backoff_secs,
        });
    }
    if fetch.per_attempt_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "fetch.per_attempt_timeout_secs" });
    }
    if fetch.failure_threshold() == 0 {
        errors.push(ValidationError::Zero { field: "fetch.circuit_failure_threshold" });
    }
    if fetch.circuit_cooldown_secs == 0 {
        errors.push(ValidationError::Zero { field: "fetch.circuit_cooldown_secs" });
    }
    for &status in &fetch.retryable_statuses {
        if !(100..=599).contains(&status) || (200..300).contains(&status) {
            errors.push(ValidationError::Status(status));
        }
    }

    match url::Url::parse(&config.target.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::TargetUrl {
            url: config.target.url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::TargetUrl {
            url: config.target.url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
