//! Region fetcher with endpoint failover and retry.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::config::FetcherConfig;
use super::error::FetchError;
use super::query::build_region_query;
use super::response::{to_features, OverpassResponse};
use super::transport::{OverpassTransport, TransportError, TransportResponse};
use crate::region::RegionKey;
use crate::road::RegionFeatureCollection;

/// Timeout applied to endpoint status probes.
const STATUS_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of region feature collections.
///
/// Implemented by [`RegionFetcher`]; the coordinator depends on this trait
/// so it can be driven by stub sources in tests.
pub trait RegionSource: Send + Sync {
    fn fetch_region(
        &self,
        key: &RegionKey,
    ) -> impl Future<Output = Result<RegionFeatureCollection, FetchError>> + Send;
}

/// Result of probing an endpoint's `/status` page.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointStatus {
    pub endpoint: String,
    pub available: bool,
    pub status: Option<u16>,
    pub message: String,
}

/// Fetches region road data from a prioritized list of Overpass endpoints.
pub struct RegionFetcher<T: OverpassTransport> {
    transport: T,
    config: FetcherConfig,
}

impl<T: OverpassTransport> RegionFetcher<T> {
    pub fn new(transport: T, config: FetcherConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch and normalize all roads for `key`.
    ///
    /// Endpoints are tried in order. Each gets up to
    /// `attempts_per_endpoint` tries separated by `retry_delay`; a timeout
    /// or 5xx abandons the endpoint immediately. When everything fails the
    /// last cause is returned inside [`FetchError::Exhausted`].
    pub async fn fetch(&self, key: &RegionKey) -> Result<RegionFeatureCollection, FetchError> {
        let region = key
            .region()
            .ok_or_else(|| FetchError::Configuration(format!("unknown region '{}'", key)))?;
        self.config.validate()?;

        let query = build_region_query(
            region,
            self.config.server_timeout_secs,
            self.config.max_size_bytes,
        );

        let mut attempts = 0usize;
        let mut last_error = None;

        for (index, endpoint) in self.config.endpoints.iter().enumerate() {
            for attempt in 1..=self.config.attempts_per_endpoint {
                attempts += 1;
                debug!(
                    region = %key,
                    endpoint = %endpoint,
                    server = index + 1,
                    attempt = attempt,
                    "Querying Overpass"
                );

                match self.attempt(endpoint, &query).await {
                    Ok(response) => {
                        let features = to_features(&response);
                        if response.elements.is_empty() {
                            warn!(
                                region = %key,
                                endpoint = %endpoint,
                                "Overpass returned no elements"
                            );
                        }
                        info!(
                            region = %key,
                            endpoint = %endpoint,
                            elements = response.elements.len(),
                            features = features.len(),
                            "Region fetched"
                        );
                        return Ok(RegionFeatureCollection::new(key.clone(), features));
                    }
                    Err(e) => {
                        warn!(
                            region = %key,
                            endpoint = %endpoint,
                            attempt = attempt,
                            error = %e,
                            "Overpass attempt failed"
                        );
                        let fail_over = e.should_fail_over();
                        last_error = Some(e);

                        if fail_over {
                            debug!(
                                endpoint = %endpoint,
                                "Server-class failure, moving to next endpoint"
                            );
                            break;
                        }
                        if attempt < self.config.attempts_per_endpoint {
                            tokio::time::sleep(self.config.retry_delay).await;
                        }
                    }
                }
            }
        }

        let last = last_error.unwrap_or_else(|| {
            FetchError::Configuration("no Overpass attempt was made".to_string())
        });
        Err(FetchError::Exhausted {
            attempts,
            endpoints: self.config.endpoints.len(),
            last: Box::new(last),
        })
    }

    /// One bounded delivery attempt against one endpoint.
    async fn attempt(&self, endpoint: &str, query: &str) -> Result<OverpassResponse, FetchError> {
        let timeout = self.config.request_timeout;
        let form = [("data", query)];
        let request = self.transport.post_form(endpoint, &form, timeout);

        let response = match tokio::time::timeout(timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(transport_error(endpoint, timeout, e)),
            Err(_) => {
                return Err(FetchError::Timeout {
                    endpoint: endpoint.to_string(),
                    after: timeout,
                })
            }
        };

        parse_response(endpoint, response)
    }

    /// Probe each configured endpoint's status page.
    pub async fn endpoint_status(&self) -> Vec<EndpointStatus> {
        let mut results = Vec::with_capacity(self.config.endpoints.len());
        for endpoint in &self.config.endpoints {
            let url = status_url(endpoint);
            let status = match self.transport.get(&url, STATUS_PROBE_TIMEOUT).await {
                Ok(response) => EndpointStatus {
                    endpoint: endpoint.clone(),
                    available: response.is_success(),
                    status: Some(response.status),
                    message: String::from_utf8_lossy(&response.body)
                        .lines()
                        .find(|l| l.contains("slots available") || l.contains("Rate limit"))
                        .unwrap_or(if response.is_success() { "OK" } else { "unavailable" })
                        .trim()
                        .to_string(),
                },
                Err(e) => EndpointStatus {
                    endpoint: endpoint.clone(),
                    available: false,
                    status: None,
                    message: e.to_string(),
                },
            };
            results.push(status);
        }
        results
    }
}

impl<T: OverpassTransport> RegionSource for RegionFetcher<T> {
    async fn fetch_region(&self, key: &RegionKey) -> Result<RegionFeatureCollection, FetchError> {
        self.fetch(key).await
    }
}

fn transport_error(endpoint: &str, timeout: Duration, e: TransportError) -> FetchError {
    match e {
        TransportError::Timeout => FetchError::Timeout {
            endpoint: endpoint.to_string(),
            after: timeout,
        },
        TransportError::Connect(message) | TransportError::Request(message) => {
            FetchError::Network {
                endpoint: endpoint.to_string(),
                message,
            }
        }
    }
}

/// Validate status, content type and body of an Overpass response.
fn parse_response(
    endpoint: &str,
    response: TransportResponse,
) -> Result<OverpassResponse, FetchError> {
    let invalid = |message: String| FetchError::InvalidResponse {
        endpoint: endpoint.to_string(),
        message,
    };

    if !response.is_success() {
        return Err(FetchError::HttpStatus {
            endpoint: endpoint.to_string(),
            status: response.status,
        });
    }

    let content_type = response.content_type.as_deref().unwrap_or("");
    if !content_type.contains("application/json") {
        return Err(invalid(format!(
            "expected JSON, got content type '{}'",
            content_type
        )));
    }

    let parsed: OverpassResponse = serde_json::from_slice(&response.body)
        .map_err(|e| invalid(format!("malformed body: {}", e)))?;

    if let Some(remark) = parsed.error_remark() {
        return Err(invalid(format!("server remark: {}", remark)));
    }

    Ok(parsed)
}

/// `https://host/api/interpreter` -> `https://host/api/status`.
fn status_url(endpoint: &str) -> String {
    match endpoint.strip_suffix("/interpreter") {
        Some(base) => format!("{}/status", base),
        None => format!("{}/status", endpoint.trim_end_matches('/')),
    }
}
