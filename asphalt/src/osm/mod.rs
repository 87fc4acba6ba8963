//! Authorized smoothness edits against the OpenStreetMap API.

mod auth;
mod client;
mod error;
mod http;
mod xml;

pub use auth::{AccessTokenSource, StaticToken, TOKEN_ENV_VAR};
pub use client::{
    changeset_comment, EditGateway, EditReceipt, OsmApiClient, OsmApiConfig, DEFAULT_API_TIMEOUT,
    DEV_API_URL, PROD_API_URL,
};
pub use error::EditError;
pub use http::{ApiMethod, ApiRequest, ApiResponse, ApiTransport, ReqwestApiTransport};
pub use xml::{changeset_xml, parse_way, way_xml, OsmWay};

#[cfg(test)]
pub(crate) use client::tests::MockGateway;
