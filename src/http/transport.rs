//! Raw request/response exchange with the upstream.
//!
//! # Responsibilities
//! - Perform exactly one GET per `send`
//! - Buffer the full response body
//! - Map every network-level fault to `FetchError::Network`
//!
//! # Design Decisions
//! - Any received response is returned as-is, whatever its status;
//!   status classification belongs to the pipeline
//! - No retries or timeouts beyond connect; those live in `resilience`

use std::time::Duration;

use futures_util::future::BoxFuture;
use url::Url;

use crate::config::TransportConfig;
use crate::fetch::error::{FetchError, FetchResult};
use crate::http::response::Response;

/// One network call.
pub trait Transport: Send + Sync {
    fn send<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, FetchResult<Response>>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn exchange(&self, url: &Url) -> FetchResult<Response> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network(describe(&e)))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(describe(&e)))?;

        tracing::debug!(url = %url, status = %status, bytes = body.len(), "Upstream responded");
        Ok(Response::new(status, headers, body.to_vec()))
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, FetchResult<Response>> {
        Box::pin(self.exchange(url))
    }
}

fn describe(err: &reqwest::Error) -> String {
    let kind = if err.is_connect() {
        "connect"
    } else if err.is_timeout() {
        "timeout"
    } else if err.is_body() || err.is_decode() {
        "body"
    } else {
        "request"
    };
    format!("{} error: {}", kind, err)
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted transport for unit tests.

    use super::*;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub(crate) enum Step {
        Reply(u16, &'static str),
        Fail(FetchError),
        Hang,
    }

    /// Plays back `Step`s in order; repeats the last one when the script runs out.
    pub(crate) struct ScriptedTransport {
        script: Mutex<VecDeque<Step>>,
        last: Mutex<Option<Step>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        pub(crate) fn new(script: Vec<Step>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                last: Mutex::new(None),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn next_step(&self) -> Option<Step> {
            let mut script = self.script.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(step) = script.pop_front() {
                *last = Some(step.clone_step());
                return Some(step);
            }
            last.as_ref().map(Step::clone_step)
        }
    }

    impl Step {
        fn clone_step(&self) -> Step {
            match self {
                Step::Reply(status, body) => Step::Reply(*status, *body),
                Step::Fail(err) => Step::Fail(err.clone()),
                Step::Hang => Step::Hang,
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn send<'a>(&'a self, _url: &'a Url) -> BoxFuture<'a, FetchResult<Response>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self.next_step();
            Box::pin(async move {
                match step {
                    Some(Step::Reply(status, body)) => Ok(Response::new(
                        StatusCode::from_u16(status).unwrap(),
                        HeaderMap::new(),
                        body.as_bytes().to_vec(),
                    )),
                    Some(Step::Fail(err)) => Err(err),
                    Some(Step::Hang) => std::future::pending().await,
                    None => Err(FetchError::Network("script exhausted".into())),
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let transport = ReqwestTransport::with_client(client);
        let url = Url::parse(&format!("http://{}/weather", addr)).unwrap();
        let result = transport.send(&url).await;

        match result {
            Err(FetchError::Network(msg)) => assert!(msg.starts_with("connect error")),
            other => panic!("expected network error, got {:?}", other),
        }
    }

    #[test]
    fn test_builds_from_config() {
        assert!(ReqwestTransport::new(&TransportConfig::default()).is_ok());
    }
}
