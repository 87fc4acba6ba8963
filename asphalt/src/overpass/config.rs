//! Configuration for the region fetcher.

use std::time::Duration;

use super::error::FetchError;

/// Default Overpass interpreter endpoints, in priority order.
pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://overpass.openstreetmap.ru/api/interpreter",
];

/// Delivery attempts per endpoint before moving on.
pub const DEFAULT_ATTEMPTS_PER_ENDPOINT: u32 = 2;

/// Fixed delay between attempts on the same endpoint.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Hard client-side deadline for one attempt.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(95);

/// Server-side query timeout embedded in the query text, in seconds.
pub const DEFAULT_SERVER_TIMEOUT_SECS: u64 = 90;

/// Maximum result size requested from the server, in bytes.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 134_217_728;

/// Configuration for [`RegionFetcher`](super::RegionFetcher).
#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    pub endpoints: Vec<String>,
    pub attempts_per_endpoint: u32,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
    pub server_timeout_secs: u64,
    pub max_size_bytes: u64,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            attempts_per_endpoint: DEFAULT_ATTEMPTS_PER_ENDPOINT,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            server_timeout_secs: DEFAULT_SERVER_TIMEOUT_SECS,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            user_agent: crate::user_agent(),
        }
    }
}

impl FetcherConfig {
    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attempts_per_endpoint(mut self, attempts: u32) -> Self {
        self.attempts_per_endpoint = attempts;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_server_timeout_secs(mut self, secs: u64) -> Self {
        self.server_timeout_secs = secs;
        self
    }

    /// Check internal consistency.
    ///
    /// The client deadline must be strictly longer than the server-side
    /// query timeout, otherwise a slow but valid answer is always cut off.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.endpoints.is_empty() {
            return Err(FetchError::Configuration(
                "at least one Overpass endpoint is required".to_string(),
            ));
        }
        if self.attempts_per_endpoint == 0 {
            return Err(FetchError::Configuration(
                "attempts_per_endpoint must be at least 1".to_string(),
            ));
        }
        if self.request_timeout <= Duration::from_secs(self.server_timeout_secs) {
            return Err(FetchError::Configuration(format!(
                "request timeout ({}s) must exceed the server query timeout ({}s)",
                self.request_timeout.as_secs(),
                self.server_timeout_secs
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetcherConfig::default();
        assert_eq!(config.endpoints.len(), 3);
        assert_eq!(config.endpoints[0], "https://overpass-api.de/api/interpreter");
        assert_eq!(config.attempts_per_endpoint, 2);
        assert_eq!(config.retry_delay, Duration::from_secs(3));
        assert_eq!(config.request_timeout, Duration::from_secs(95));
        assert_eq!(config.server_timeout_secs, 90);
        assert!(config.user_agent.starts_with("AsphaltPremium/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_must_exceed_server_timeout() {
        let config = FetcherConfig::default().with_request_timeout(Duration::from_secs(90));
        assert!(matches!(
            config.validate(),
            Err(FetchError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_empty_endpoints_and_zero_attempts() {
        let empty: [&str; 0] = [];
        assert!(FetcherConfig::default()
            .with_endpoints(empty)
            .validate()
            .is_err());
        assert!(FetcherConfig::default()
            .with_attempts_per_endpoint(0)
            .validate()
            .is_err());
    }
}
