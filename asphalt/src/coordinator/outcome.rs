//! Outcomes of coordinator operations and failure classification.

use std::fmt;
use std::time::Duration;

use crate::cache::format_age;
use crate::overpass::FetchError;
use crate::region::RegionKey;
use crate::render::RoadCounts;

/// User-facing category of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    /// HTTP 504 from an endpoint
    GatewayTimeout,
    /// HTTP 429 from an endpoint
    RateLimited,
    Network,
    /// Any other HTTP 5xx
    Server,
    Configuration,
    Other,
}

impl FailureKind {
    /// Classify by the underlying cause of `error`.
    pub fn classify(error: &FetchError) -> Self {
        match error.root_cause() {
            FetchError::Configuration(_) => FailureKind::Configuration,
            FetchError::Timeout { .. } => FailureKind::Timeout,
            FetchError::HttpStatus { status: 504, .. } => FailureKind::GatewayTimeout,
            FetchError::HttpStatus { status: 429, .. } => FailureKind::RateLimited,
            FetchError::HttpStatus { status, .. } if *status >= 500 => FailureKind::Server,
            FetchError::Network { .. } => FailureKind::Network,
            _ => FailureKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::GatewayTimeout => "gateway timeout",
            FailureKind::RateLimited => "rate limited",
            FailureKind::Network => "network",
            FailureKind::Server => "server error",
            FailureKind::Configuration => "configuration",
            FailureKind::Other => "error",
        }
    }

    /// Explanation suitable for an end user.
    pub fn message(&self) -> &'static str {
        match self {
            FailureKind::Timeout => {
                "The Overpass servers did not answer in time. Large regions can take several minutes; try again later."
            }
            FailureKind::GatewayTimeout => {
                "The Overpass servers are overloaded (gateway timeout). Try again in a few minutes."
            }
            FailureKind::RateLimited => {
                "Too many requests to the Overpass servers. Wait a moment before refreshing again."
            }
            FailureKind::Network => {
                "Could not reach the Overpass servers. Check your internet connection."
            }
            FailureKind::Server => "The Overpass servers reported an error. Try again later.",
            FailureKind::Configuration => {
                "The request could not be built. Check the region and configuration."
            }
            FailureKind::Other => "Error while fetching road data.",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of showing a region from the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Displayed { region: RegionKey, counts: RoadCounts },
    /// Nothing usable cached; the display is unchanged.
    NotCached { region: RegionKey },
}

impl LoadOutcome {
    pub fn message(&self) -> String {
        match self {
            LoadOutcome::Displayed { region, counts } => {
                format!("Loaded {} from cache: {}", region, counts)
            }
            LoadOutcome::NotCached { region } => {
                format!("No cached data for {}. Refresh to fetch it.", region)
            }
        }
    }
}

/// Result of a forced refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Another refresh is in flight.
    Rejected,
    /// The region has no matching roads. The empty result is displayed.
    NoData { region: RegionKey, cached: bool },
    Fetched {
        region: RegionKey,
        counts: RoadCounts,
        /// Whether the result was persisted
        cached: bool,
    },
    /// The fetch failed and an older cached copy is displayed instead.
    StaleFallback {
        region: RegionKey,
        counts: RoadCounts,
        kind: FailureKind,
        age: Duration,
    },
    /// The fetch failed and nothing cached was available.
    Failed {
        region: RegionKey,
        kind: FailureKind,
        message: String,
    },
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RefreshOutcome::Fetched { .. } | RefreshOutcome::NoData { .. })
    }

    pub fn counts(&self) -> Option<RoadCounts> {
        match self {
            RefreshOutcome::Fetched { counts, .. }
            | RefreshOutcome::StaleFallback { counts, .. } => Some(*counts),
            RefreshOutcome::NoData { .. } => Some(RoadCounts::default()),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            RefreshOutcome::Rejected => "A refresh is already in progress.".to_string(),
            RefreshOutcome::NoData { region, .. } => {
                format!("No road data for {}.", region)
            }
            RefreshOutcome::Fetched { region, counts, cached } => {
                let mut message = format!("Fetched {} from Overpass: {}", region, counts);
                if !*cached {
                    message.push_str(" (not saved to cache)");
                }
                message
            }
            RefreshOutcome::StaleFallback {
                region,
                counts,
                kind,
                age,
            } => format!(
                "{} Showing cached data for {} from {} ago: {}",
                kind.message(),
                region,
                format_age(*age),
                counts
            ),
            RefreshOutcome::Failed { message, .. } => message.clone(),
        }
    }
}
