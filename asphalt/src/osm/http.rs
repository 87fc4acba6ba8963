//! HTTP seam for the OSM API client.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::EditError;

/// HTTP verbs used by the edit sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Put,
}

impl ApiMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiMethod::Get => "GET",
            ApiMethod::Put => "PUT",
        }
    }
}

/// One authorized API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: ApiMethod,
    pub url: String,
    pub token: String,
    pub body: Option<String>,
}

/// Status and text body of an API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success status into [`EditError::Http`].
    pub fn into_success(self) -> Result<String, EditError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(EditError::Http {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Transport for authorized API calls.
pub trait ApiTransport: Send + Sync {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, EditError>> + Send;
}

/// Transport backed by `reqwest` with bearer authentication.
#[derive(Clone)]
pub struct ReqwestApiTransport {
    client: reqwest::Client,
}

impl ReqwestApiTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, EditError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| EditError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl ApiTransport for ReqwestApiTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, EditError> {
        let builder = match request.method {
            ApiMethod::Get => self.client.get(&request.url),
            ApiMethod::Put => self
                .client
                .put(&request.url)
                .header(reqwest::header::CONTENT_TYPE, "text/xml")
                .body(request.body.unwrap_or_default()),
        };

        let response = builder
            .bearer_auth(&request.token)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %request.url, error = %e, "OSM API request failed");
                EditError::Network(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| EditError::Network(e.to_string()))?;
        debug!(url = %request.url, status = status, "OSM API response");

        Ok(ApiResponse { status, body })
    }
}
