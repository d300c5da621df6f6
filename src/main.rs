//! Weather fetch demo.
//!
//! Fetches a JSON weather payload through the resilient pipeline and prints
//! it, then waits for Enter before fetching again. Repeated fetches inside
//! the cache TTL are served from memory; `q` or Ctrl-C exits.
//!
//! ```text
//!   stdin ──▶ loop ──▶ FetchPipeline ──▶ cache ─▶ breaker ─▶ retry ─▶ timeout ─▶ reqwest
//!               │
//!               ▼
//!            stdout (pretty JSON or raw body)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use weather_fetch::config::{load_config, AppConfig};
use weather_fetch::lifecycle::{signals, startup, Shutdown};
use weather_fetch::{ErrorKind, FetchError, FetchPipeline, Response};

#[derive(Parser)]
#[command(name = "weather-fetch")]
#[command(about = "Fetch and print weather JSON through a resilient, caching client", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured target URL.
    #[arg(short, long)]
    url: Option<String>,

    /// Fetch once and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(url) = cli.url {
        config.target.url = url;
    }

    startup::init_observability(&config);
    tracing::info!(
        target_url = %config.target.url,
        cache_ttl_secs = config.fetch.cache_ttl_secs,
        max_retries = config.fetch.max_retries,
        "weather-fetch v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let pipeline = startup::build_pipeline(&config)?;
    let shutdown = Shutdown::new();
    let _signals = signals::listen_for_ctrl_c(shutdown.clone());

    if cli.once {
        return match fetch_and_print(&pipeline, &config.target.url, &shutdown).await {
            Some(FetchError::Cancelled) | None => Ok(()),
            Some(err) => Err(err.into()),
        };
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if let Some(FetchError::Cancelled) =
            fetch_and_print(&pipeline, &config.target.url, &shutdown).await
        {
            break;
        }

        println!("Press Enter to fetch again, or q to quit.");
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = shutdown.triggered() => None,
        };
        match line {
            Some(input) if input.trim().eq_ignore_ascii_case("q") => break,
            Some(_) => continue,
            None => break,
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Fetch once and print the outcome. Returns the error, if any.
async fn fetch_and_print(
    pipeline: &FetchPipeline,
    url: &str,
    shutdown: &Shutdown,
) -> Option<FetchError> {
    let cancel = shutdown.child_token();
    match pipeline.fetch_with_cancel(url, &cancel).await {
        Ok(response) => {
            print_response(&response);
            None
        }
        Err(err) => {
            match err.kind() {
                ErrorKind::CircuitOpen => eprintln!("Service unavailable, not retrying yet: {}", err),
                ErrorKind::Cancelled => {}
                ErrorKind::Transient => eprintln!("Temporary failure: {}", err),
                ErrorKind::Permanent => eprintln!("Request failed: {}", err),
            }
            Some(err)
        }
    }
}

fn print_response(response: &Response) {
    match serde_json::from_slice::<serde_json::Value>(response.body()) {
        Ok(json) => match serde_json::to_string_pretty(&json) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", response.text()),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Response body is not JSON");
            println!("{}", response.text());
        }
    }
}
