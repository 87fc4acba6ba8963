//! HTTP transport abstraction for testability.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Transport-level failure, before any Overpass-specific interpretation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Raw HTTP response as seen by the fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// A 200 response with a JSON body.
    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: body.into(),
        }
    }

    /// A bare status response with an empty body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: Some("text/html".to_string()),
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for the HTTP operations the fetcher needs.
///
/// Non-success statuses are returned as responses, not errors, so the
/// fetcher can decide between retry and failover.
pub trait OverpassTransport: Send + Sync {
    /// POST a form-encoded body.
    fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        timeout: Duration,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;

    /// Plain GET, used for endpoint status probes.
    fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// Transport backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport that identifies itself with `user_agent`.
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| TransportError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn read(
        url: &str,
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<TransportResponse, TransportError> {
        let response = match result {
            Ok(resp) => {
                debug!(url = url, status = resp.status().as_u16(), "HTTP response received");
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(classify(e));
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(TransportResponse {
                    status,
                    content_type,
                    body: bytes.to_vec(),
                })
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(classify(e))
            }
        }
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}

impl OverpassTransport for ReqwestTransport {
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        trace!(url = url, "HTTP POST request starting");
        let result = self
            .client
            .post(url)
            .timeout(timeout)
            .form(form)
            .send()
            .await;
        Self::read(url, result).await
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse, TransportError> {
        trace!(url = url, "HTTP GET request starting");
        let result = self.client.get(url).timeout(timeout).send().await;
        Self::read(url, result).await
    }
}
