//! Error types for region fetching.

use std::time::Duration;
use thiserror::Error;

/// Errors produced while fetching a region from the Overpass endpoints.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Unknown region or invalid fetcher settings. Never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A single attempt exceeded its deadline.
    #[error("Request to {endpoint} timed out after {}s", .after.as_secs())]
    Timeout { endpoint: String, after: Duration },

    /// Endpoint answered with a non-success HTTP status.
    #[error("HTTP {status} from {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    /// Connection-level failure (DNS, refused, reset).
    #[error("Network error contacting {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    /// Response arrived but is not a usable Overpass result.
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    /// Every endpoint and attempt failed; carries the last cause.
    #[error("All {attempts} attempts across {endpoints} endpoints failed; last error: {last}")]
    Exhausted {
        attempts: usize,
        endpoints: usize,
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// HTTP 5xx.
    pub fn is_server_error(&self) -> bool {
        matches!(self, FetchError::HttpStatus { status, .. } if *status >= 500)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }

    /// Whether the fetcher should abandon the current endpoint at once.
    pub fn should_fail_over(&self) -> bool {
        self.is_server_error() || self.is_timeout()
    }

    /// The underlying cause, unwrapping [`FetchError::Exhausted`].
    pub fn root_cause(&self) -> &FetchError {
        match self {
            FetchError::Exhausted { last, .. } => last.root_cause(),
            other => other,
        }
    }

    /// HTTP status of the underlying cause, if any.
    pub fn status(&self) -> Option<u16> {
        match self.root_cause() {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> FetchError {
        FetchError::HttpStatus {
            endpoint: "https://a".to_string(),
            status: code,
        }
    }

    #[test]
    fn test_failover_classification() {
        assert!(status(500).should_fail_over());
        assert!(status(504).should_fail_over());
        assert!(!status(429).should_fail_over());
        assert!(!status(400).should_fail_over());
        assert!(FetchError::Timeout {
            endpoint: "https://a".to_string(),
            after: Duration::from_secs(95),
        }
        .should_fail_over());
        assert!(!FetchError::Network {
            endpoint: "https://a".to_string(),
            message: "refused".to_string(),
        }
        .should_fail_over());
    }

    #[test]
    fn test_root_cause_unwraps_exhausted() {
        let err = FetchError::Exhausted {
            attempts: 3,
            endpoints: 3,
            last: Box::new(status(504)),
        };
        assert_eq!(err.root_cause(), &status(504));
        assert_eq!(err.status(), Some(504));
    }

    #[test]
    fn test_display_includes_last_cause() {
        let err = FetchError::Exhausted {
            attempts: 2,
            endpoints: 1,
            last: Box::new(status(429)),
        };
        assert!(err.to_string().contains("HTTP 429"));
    }
}
