//! Fetch pipeline: the only entry point callers use.
//!
//! # Responsibilities
//! - Serve fresh cached responses without touching anything downstream
//! - Otherwise run Breaker → Retry → Timeout → Transport
//! - Classify the upstream status and cache successes only
//!
//! # Design Decisions
//! - Wrapping order is fixed: cache outermost, transport innermost
//! - Breaker wraps retry so it counts calls, not attempts
//! - Status classification happens per attempt, so configured
//!   retryable statuses flow through retry like network faults
//! - Cancellation drops the in-flight call; the breaker never counts it

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::cache::ResponseCache;
use crate::config::FetchConfig;
use crate::fetch::error::{FetchError, FetchResult};
use crate::http::request::{cache_key, parse_uri};
use crate::http::{Response, Transport};
use crate::observability::metrics;
use crate::resilience::{CircuitBreaker, Clock, RetryPolicy, SystemClock, TimeoutGuard};

/// Resilient, caching request layer for a single upstream endpoint.
pub struct FetchPipeline {
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
    breaker: CircuitBreaker,
    retry: RetryPolicy,
    timeout: TimeoutGuard,
    config: FetchConfig,
}

impl FetchPipeline {
    /// Create a pipeline on real time.
    pub fn new(config: FetchConfig, transport: Arc<dyn Transport>) -> Self {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    /// Create a pipeline with an injected clock.
    pub fn with_clock(
        config: FetchConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        tracing::debug!(
            cache_ttl_secs = config.cache_ttl_secs,
            max_retries = config.max_retries,
            per_attempt_timeout_secs = config.per_attempt_timeout_secs,
            failure_threshold = config.failure_threshold(),
            cooldown_secs = config.circuit_cooldown_secs,
            "Fetch pipeline configured"
        );

        Self {
            transport,
            cache: ResponseCache::new(clock.clone()),
            breaker: CircuitBreaker::new(
                config.failure_threshold(),
                config.circuit_cooldown(),
                clock.clone(),
            ),
            retry: RetryPolicy::new(
                config.max_retries,
                config.base_backoff_secs,
                config.max_backoff(),
                clock.clone(),
            ),
            timeout: TimeoutGuard::new(config.per_attempt_timeout(), clock),
            config,
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Fetch `uri`, returning a cached or fresh successful response.
    pub async fn fetch(&self, uri: &str) -> FetchResult<Arc<Response>> {
        let span = tracing::info_span!("fetch", request_id = %Uuid::new_v4(), uri = %uri);
        let start = Instant::now();

        let result = self.fetch_inner(uri).instrument(span).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.label(),
        };
        metrics::record_fetch(outcome, start);
        result
    }

    /// Like [`fetch`](Self::fetch), abandoning the call when `cancel` fires.
    pub async fn fetch_with_cancel(
        &self,
        uri: &str,
        cancel: &CancellationToken,
    ) -> FetchResult<Arc<Response>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(uri = %uri, "Fetch cancelled");
                Err(FetchError::Cancelled)
            }
            result = self.fetch(uri) => result,
        }
    }

    async fn fetch_inner(&self, uri: &str) -> FetchResult<Arc<Response>> {
        let url = parse_uri(uri)?;
        let key = cache_key(&url);

        if let Some(cached) = self.cache.get(&key) {
            metrics::record_cache_lookup(true);
            tracing::debug!(key = %key, "Cache hit");
            return Ok(cached);
        }
        metrics::record_cache_lookup(false);
        tracing::debug!(key = %key, "Cache miss");

        let url = &url;
        let result = self
            .breaker
            .call(move || self.retry.run(move |attempt| self.attempt(url, attempt)))
            .await;

        match &result {
            Ok(response) => {
                self.cache.put(key, response.clone(), self.config.cache_ttl());
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind(), "Fetch failed");
            }
        }
        result
    }

    async fn attempt(&self, url: &Url, attempt: u32) -> FetchResult<Arc<Response>> {
        tracing::debug!(attempt, "Sending request");
        let response = self.timeout.run(self.transport.send(url)).await?;
        self.classify(response)
    }

    fn classify(&self, response: Response) -> FetchResult<Arc<Response>> {
        let status = response.status().as_u16();
        if response.is_success() {
            return Ok(Arc::new(response));
        }
        if self.config.retryable_statuses.contains(&status) {
            return Err(FetchError::RetryableStatus { status });
        }
        tracing::warn!(status, "Upstream returned non-success status");
        Err(FetchError::PermanentHttp { status })
    }
}

impl std::fmt::Debug for FetchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchPipeline")
            .field("config", &self.config)
            .field("breaker", &self.breaker.snapshot())
            .field("cached_entries", &self.cache.len())
            .finish()
    }
}
