//! OpenStreetMap API 0.6 client for smoothness edits.
//!
//! An edit is four calls: read the way, open a changeset, write the way
//! into it and close it. A failure after the changeset is opened still
//! attempts to close it before the error is returned.

use std::future::Future;
use std::time::Duration;

use tracing::{error, info, warn};

use super::error::EditError;
use super::http::{ApiMethod, ApiRequest, ApiTransport, ReqwestApiTransport};
use super::xml::{changeset_xml, parse_way, way_xml, OsmWay};

/// Development API server.
pub const DEV_API_URL: &str = "https://master.apis.dev.openstreetmap.org";

/// Production API server.
pub const PROD_API_URL: &str = "https://api.openstreetmap.org";

/// Default per-request timeout.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

const CHANGESET_DESCRIPTION: &str = "Road quality assessment via Asphalt Premium";

/// OSM API client settings.
#[derive(Debug, Clone)]
pub struct OsmApiConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for OsmApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEV_API_URL.to_string(),
            timeout: DEFAULT_API_TIMEOUT,
            user_agent: crate::user_agent(),
        }
    }
}

impl OsmApiConfig {
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_dev_server(&self) -> bool {
        self.api_url == DEV_API_URL
    }
}

/// Outcome of a successful edit.
#[derive(Debug, Clone, PartialEq)]
pub struct EditReceipt {
    pub way_id: u64,
    pub new_version: u64,
    pub old_smoothness: Option<String>,
    pub new_smoothness: String,
    pub changeset_id: u64,
}

/// Remote write of a smoothness value.
pub trait EditGateway: Send + Sync {
    fn update_smoothness(
        &self,
        token: &str,
        way_id: u64,
        smoothness: &str,
    ) -> impl Future<Output = Result<EditReceipt, EditError>> + Send;
}

/// Changeset comment for a smoothness change.
pub fn changeset_comment(old: Option<&str>, new: &str) -> String {
    match old {
        Some(old) => format!("Updated smoothness from {} to {}", old, new),
        None => format!("Added smoothness tag: {}", new),
    }
}

/// OSM API client.
pub struct OsmApiClient<T: ApiTransport = ReqwestApiTransport> {
    transport: T,
    config: OsmApiConfig,
}

impl OsmApiClient<ReqwestApiTransport> {
    /// Client over HTTPS.
    pub fn connect(config: OsmApiConfig) -> Result<Self, EditError> {
        let transport = ReqwestApiTransport::new(&config.user_agent, config.timeout)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: ApiTransport> OsmApiClient<T> {
    pub fn new(transport: T, config: OsmApiConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &OsmApiConfig {
        &self.config
    }

    /// Set the smoothness tag of a way.
    ///
    /// `comment` overrides the generated changeset comment.
    pub async fn update_smoothness_with_comment(
        &self,
        token: &str,
        way_id: u64,
        smoothness: &str,
        comment: Option<&str>,
    ) -> Result<EditReceipt, EditError> {
        info!(way_id = way_id, smoothness = smoothness, "Updating smoothness");

        let mut way = self.get_way(token, way_id).await?;
        let old_smoothness = way.tag("smoothness").map(str::to_string);
        way.set_tag("smoothness", smoothness);

        let comment = comment
            .map(str::to_string)
            .unwrap_or_else(|| changeset_comment(old_smoothness.as_deref(), smoothness));
        let changeset_id = self.create_changeset(token, &comment).await?;

        let new_version = match self.write_and_close(token, &way, changeset_id).await {
            Ok(version) => version,
            Err(e) => {
                error!(way_id = way_id, changeset_id = changeset_id, error = %e, "Edit failed");
                if let Err(close_err) = self.close_changeset(token, changeset_id).await {
                    warn!(
                        changeset_id = changeset_id,
                        error = %close_err,
                        "Failed to close changeset after error"
                    );
                }
                return Err(e);
            }
        };

        info!(
            way_id = way_id,
            new_version = new_version,
            changeset_id = changeset_id,
            "Smoothness updated"
        );

        Ok(EditReceipt {
            way_id,
            new_version,
            old_smoothness,
            new_smoothness: smoothness.to_string(),
            changeset_id,
        })
    }

    /// Read a way with its nodes and tags.
    pub async fn get_way(&self, token: &str, way_id: u64) -> Result<OsmWay, EditError> {
        let body = self
            .call(ApiMethod::Get, &format!("/api/0.6/way/{}", way_id), token, None)
            .await?;
        parse_way(&body)
    }

    /// Open a changeset. Returns its id.
    pub async fn create_changeset(&self, token: &str, comment: &str) -> Result<u64, EditError> {
        let created_by = format!("Asphalt Premium {}", crate::VERSION);
        let body = changeset_xml(&[
            ("created_by", created_by.as_str()),
            ("comment", comment),
            ("source", "survey"),
            ("description", CHANGESET_DESCRIPTION),
        ]);
        let response = self
            .call(ApiMethod::Put, "/api/0.6/changeset/create", token, Some(body))
            .await?;
        let id = parse_number(&response, "changeset id")?;
        info!(changeset_id = id, "Changeset created");
        Ok(id)
    }

    /// Write `way` into a changeset. Returns the new version.
    pub async fn update_way(
        &self,
        token: &str,
        way: &OsmWay,
        changeset_id: u64,
    ) -> Result<u64, EditError> {
        let response = self
            .call(
                ApiMethod::Put,
                &format!("/api/0.6/way/{}", way.id),
                token,
                Some(way_xml(way, changeset_id)),
            )
            .await?;
        parse_number(&response, "way version")
    }

    pub async fn close_changeset(&self, token: &str, changeset_id: u64) -> Result<(), EditError> {
        self.call(
            ApiMethod::Put,
            &format!("/api/0.6/changeset/{}/close", changeset_id),
            token,
            None,
        )
        .await?;
        info!(changeset_id = changeset_id, "Changeset closed");
        Ok(())
    }

    async fn write_and_close(
        &self,
        token: &str,
        way: &OsmWay,
        changeset_id: u64,
    ) -> Result<u64, EditError> {
        let version = self.update_way(token, way, changeset_id).await?;
        self.close_changeset(token, changeset_id).await?;
        Ok(version)
    }

    async fn call(
        &self,
        method: ApiMethod,
        path: &str,
        token: &str,
        body: Option<String>,
    ) -> Result<String, EditError> {
        let request = ApiRequest {
            method,
            url: format!("{}{}", self.config.api_url, path),
            token: token.to_string(),
            body,
        };
        self.transport.send(request).await?.into_success()
    }
}

impl<T: ApiTransport> EditGateway for OsmApiClient<T> {
    async fn update_smoothness(
        &self,
        token: &str,
        way_id: u64,
        smoothness: &str,
    ) -> Result<EditReceipt, EditError> {
        self.update_smoothness_with_comment(token, way_id, smoothness, None)
            .await
    }
}

fn parse_number(body: &str, what: &str) -> Result<u64, EditError> {
    body.trim()
        .parse()
        .map_err(|_| {
            EditError::InvalidResponse(format!("expected {}, got '{}'", what, body.trim()))
        })
}
