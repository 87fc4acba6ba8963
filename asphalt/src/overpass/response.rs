//! Overpass JSON response parsing and normalization into road features.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::trace;

use crate::road::{normalize_smoothness, LatLon, RoadFeature};

/// Top-level Overpass response. Only the fields we use are deserialized.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub remark: Option<String>,
    pub elements: Vec<OverpassElement>,
}

/// One element of the `elements` array.
#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub geometry: Vec<Option<GeometryPoint>>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// A geometry vertex. Overpass emits `null` for vertices outside the bbox.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GeometryPoint {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassResponse {
    /// The `remark` field when it reports a server-side failure.
    pub fn error_remark(&self) -> Option<&str> {
        self.remark
            .as_deref()
            .filter(|r| r.to_lowercase().contains("error"))
    }
}

/// Convert one element into a feature.
///
/// Returns `None` for non-way elements and for ways with fewer than two
/// usable vertices.
pub fn to_feature(element: &OverpassElement) -> Option<RoadFeature> {
    if element.kind != "way" {
        trace!(id = element.id, kind = %element.kind, "Skipping non-way element");
        return None;
    }

    let geometry: Vec<LatLon> = element
        .geometry
        .iter()
        .flatten()
        .map(|p| LatLon::new(p.lat, p.lon))
        .collect();

    if geometry.len() < 2 {
        trace!(id = element.id, points = geometry.len(), "Skipping way without line geometry");
        return None;
    }

    let tags = &element.tags;
    let tag = |key: &str| {
        tags.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    Some(RoadFeature {
        id: element.id,
        geometry,
        name: tag("name").or_else(|| tag("name:pl")).or_else(|| tag("name:en")),
        road_class: tag("highway").unwrap_or_else(|| "unknown".to_string()),
        smoothness: tags.get("smoothness").and_then(|v| normalize_smoothness(v)),
        version: element.version,
        max_speed: tag("maxspeed"),
        lanes: tag("lanes"),
        width: tag("width"),
        reference: tag("ref"),
        operator: tag("operator"),
        oneway: tags.get("oneway").map(|v| v == "yes").unwrap_or(false),
    })
}

/// Convert all usable elements, preserving response order.
pub fn to_features(response: &OverpassResponse) -> Vec<RoadFeature> {
    response.elements.iter().filter_map(to_feature).collect()
}
