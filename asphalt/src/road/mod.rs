//! Road domain model: features, collections and quality classification.

mod quality;
mod types;

pub use quality::{
    bucket_for, is_valid_smoothness, normalize_smoothness, smoothness_label, QualityBucket,
    SMOOTHNESS_VALUES,
};
pub use types::{LatLon, RegionFeatureCollection, RoadFeature};
