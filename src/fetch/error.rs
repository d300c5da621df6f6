//! Error classification for fetch outcomes.

use std::time::Duration;
use thiserror::Error;

/// How a failure should be treated by retry and breaker logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Intermittent; worth retrying and counted by the breaker.
    Transient,
    /// Retrying cannot fix it; surfaced immediately, never counted.
    Permanent,
    /// Rejected by the breaker without touching the transport.
    CircuitOpen,
    /// Abandoned by the caller; says nothing about endpoint health.
    Cancelled,
}

/// Errors that can occur while fetching a URI.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection refused, reset, DNS failure or a broken body stream.
    #[error("network error: {0}")]
    Network(String),

    /// A single attempt did not complete within its deadline.
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    /// Upstream answered with a status configured as retryable.
    #[error("upstream returned retryable status {status}")]
    RetryableStatus { status: u16 },

    /// Every attempt failed transiently.
    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<FetchError> },

    /// Upstream answered with a non-success status.
    #[error("upstream returned non-success status {status}")]
    PermanentHttp { status: u16 },

    /// The URI could not be parsed or uses an unsupported scheme.
    #[error("invalid uri '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    /// Circuit breaker is open; nothing was sent.
    #[error("circuit open, retry in {retry_after:?}")]
    CircuitOpen { retry_after: Duration },

    /// The caller cancelled the fetch.
    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network(_)
            | FetchError::Timeout(_)
            | FetchError::RetryableStatus { .. }
            | FetchError::RetriesExhausted { .. } => ErrorKind::Transient,
            FetchError::PermanentHttp { .. } | FetchError::InvalidUri { .. } => {
                ErrorKind::Permanent
            }
            FetchError::CircuitOpen { .. } => ErrorKind::CircuitOpen,
            FetchError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    /// Short label used for metrics and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Timeout(_) => "timeout",
            FetchError::RetryableStatus { .. } => "retryable_status",
            FetchError::RetriesExhausted { .. } => "exhausted",
            FetchError::PermanentHttp { .. } => "permanent_http",
            FetchError::InvalidUri { .. } => "invalid_uri",
            FetchError::CircuitOpen { .. } => "circuit_open",
            FetchError::Cancelled => "cancelled",
        }
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
