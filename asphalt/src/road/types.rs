//! Typed road feature model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quality::{bucket_for, QualityBucket};
use crate::region::RegionKey;

/// A point in render order: latitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One linear road segment.
///
/// The quality bucket is never stored; [`RoadFeature::quality_bucket`]
/// recomputes it from `smoothness` on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadFeature {
    /// Way id in the geodata store
    pub id: u64,
    /// Path in insertion order, at least two points when drawable
    pub geometry: Vec<LatLon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Functional classification (`highway` tag)
    pub road_class: String,
    /// Normalized smoothness; `None` means unassessed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothness: Option<String>,
    /// Remote object version, required before an edit write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lanes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default)]
    pub oneway: bool,
}

impl RoadFeature {
    /// Create a feature with only the required fields set.
    pub fn new(id: u64, geometry: Vec<LatLon>, road_class: impl Into<String>) -> Self {
        Self {
            id,
            geometry,
            name: None,
            road_class: road_class.into(),
            smoothness: None,
            version: None,
            max_speed: None,
            lanes: None,
            width: None,
            reference: None,
            operator: None,
            oneway: false,
        }
    }

    pub fn with_smoothness(mut self, smoothness: impl Into<String>) -> Self {
        self.smoothness = Some(smoothness.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn quality_bucket(&self) -> QualityBucket {
        bucket_for(self.smoothness.as_deref())
    }

    /// Whether the geometry can be drawn as a line.
    pub fn is_drawable(&self) -> bool {
        self.geometry.len() >= 2
    }

    /// First and last point of the path.
    pub fn endpoints(&self) -> Option<(LatLon, LatLon)> {
        match (self.geometry.first(), self.geometry.last()) {
            (Some(first), Some(last)) if self.is_drawable() => Some((*first, *last)),
            _ => None,
        }
    }

    /// Short hover label, e.g. `DW 454 (good)`.
    pub fn tooltip(&self) -> String {
        format!(
            "{} ({})",
            self.name.as_deref().unwrap_or("unnamed road"),
            self.smoothness.as_deref().unwrap_or("no data")
        )
    }
}

/// Complete result set for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionFeatureCollection {
    pub source_region: RegionKey,
    pub fetched_at: DateTime<Utc>,
    pub features: Vec<RoadFeature>,
}

impl RegionFeatureCollection {
    pub fn new(source_region: RegionKey, features: Vec<RoadFeature>) -> Self {
        Self {
            source_region,
            fetched_at: Utc::now(),
            features,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn feature(&self, id: u64) -> Option<&RoadFeature> {
        self.features.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Vec<LatLon> {
        vec![LatLon::new(50.6, 17.9), LatLon::new(50.7, 18.0)]
    }

    #[test]
    fn test_bucket_follows_smoothness() {
        let mut feature = RoadFeature::new(1, line(), "tertiary");
        assert_eq!(feature.quality_bucket(), QualityBucket::Unknown);

        feature.smoothness = Some("good".to_string());
        assert_eq!(feature.quality_bucket(), QualityBucket::Good);

        feature.smoothness = Some("horrible".to_string());
        assert_eq!(feature.quality_bucket(), QualityBucket::Poor);
    }

    #[test]
    fn test_endpoints() {
        let feature = RoadFeature::new(
            1,
            vec![
                LatLon::new(1.0, 1.0),
                LatLon::new(2.0, 2.0),
                LatLon::new(3.0, 3.0),
            ],
            "tertiary",
        );
        let (first, last) = feature.endpoints().unwrap();
        assert_eq!(first, LatLon::new(1.0, 1.0));
        assert_eq!(last, LatLon::new(3.0, 3.0));

        let single = RoadFeature::new(2, vec![LatLon::new(1.0, 1.0)], "tertiary");
        assert!(single.endpoints().is_none());
    }

    #[test]
    fn test_tooltip() {
        let feature = RoadFeature::new(1, line(), "tertiary")
            .with_name("DW 454")
            .with_smoothness("good");
        assert_eq!(feature.tooltip(), "DW 454 (good)");
        assert_eq!(
            RoadFeature::new(2, line(), "unclassified").tooltip(),
            "unnamed road (no data)"
        );
    }

    #[test]
    fn test_serialized_feature_omits_bucket() {
        let feature = RoadFeature::new(7, line(), "tertiary").with_smoothness("good");
        let json = serde_json::to_value(&feature).unwrap();
        assert!(json.get("quality_bucket").is_none());
        assert_eq!(json["smoothness"], "good");
    }
}
