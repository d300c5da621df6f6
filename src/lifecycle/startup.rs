//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize observability from configuration
//! - Build the transport and the fetch pipeline in dependency order
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Logging first, so later steps can report

use std::sync::Arc;

use thiserror::Error;

use crate::config::AppConfig;
use crate::fetch::FetchPipeline;
use crate::http::ReqwestTransport;
use crate::observability::{logging, metrics};

/// Install logging and, when enabled, the metrics exporter.
pub fn init_observability(config: &AppConfig) {
    logging::init_logging(&config.observability);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }
}

/// Fatal faults while wiring the process. Never retried.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Build the production pipeline: reqwest transport on real time.
pub fn build_pipeline(config: &AppConfig) -> Result<FetchPipeline, StartupError> {
    let transport = ReqwestTransport::new(&config.transport)?;
    tracing::info!(
        user_agent = %config.transport.user_agent,
        connect_timeout_secs = config.transport.connect_timeout_secs,
        "HTTP transport ready"
    );
    Ok(FetchPipeline::new(config.fetch.clone(), Arc::new(transport)))
}
