//! Display state: what is drawn, what is selected, what is visible.

use std::collections::HashMap;
use std::fmt;

use super::canvas::HandleId;
use super::style::DEFAULT_ZOOM;
use crate::region::RegionKey;
use crate::road::{QualityBucket, RoadFeature};

/// Per-bucket feature counts of a displayed collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoadCounts {
    pub excellent: usize,
    pub good: usize,
    pub poor: usize,
    pub unknown: usize,
    pub total: usize,
}

impl RoadCounts {
    pub fn add(&mut self, bucket: QualityBucket) {
        match bucket {
            QualityBucket::Excellent => self.excellent += 1,
            QualityBucket::Good => self.good += 1,
            QualityBucket::Poor => self.poor += 1,
            QualityBucket::Unknown => self.unknown += 1,
        }
        self.total += 1;
    }

    pub fn get(&self, bucket: QualityBucket) -> usize {
        match bucket {
            QualityBucket::Excellent => self.excellent,
            QualityBucket::Good => self.good,
            QualityBucket::Poor => self.poor,
            QualityBucket::Unknown => self.unknown,
        }
    }

    /// Count a set of features by bucket.
    pub fn tally<'a>(features: impl IntoIterator<Item = &'a RoadFeature>) -> Self {
        let mut counts = Self::default();
        for feature in features {
            counts.add(feature.quality_bucket());
        }
        counts
    }
}

impl fmt::Display for RoadCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} roads (excellent: {}, good: {}, poor: {}, unknown: {})",
            self.total, self.excellent, self.good, self.poor, self.unknown
        )
    }
}

/// Per-bucket visibility flags. All buckets start visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketVisibility {
    excellent: bool,
    good: bool,
    poor: bool,
    unknown: bool,
}

impl Default for BucketVisibility {
    fn default() -> Self {
        Self {
            excellent: true,
            good: true,
            poor: true,
            unknown: true,
        }
    }
}

impl BucketVisibility {
    pub fn is_visible(&self, bucket: QualityBucket) -> bool {
        match bucket {
            QualityBucket::Excellent => self.excellent,
            QualityBucket::Good => self.good,
            QualityBucket::Poor => self.poor,
            QualityBucket::Unknown => self.unknown,
        }
    }

    pub fn set(&mut self, bucket: QualityBucket, visible: bool) {
        let flag = match bucket {
            QualityBucket::Excellent => &mut self.excellent,
            QualityBucket::Good => &mut self.good,
            QualityBucket::Poor => &mut self.poor,
            QualityBucket::Unknown => &mut self.unknown,
        };
        *flag = visible;
    }
}

/// A feature that is currently drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedFeature {
    pub feature: RoadFeature,
    pub handle: HandleId,
}

/// Everything the engine knows about the current display.
#[derive(Debug, Clone)]
pub struct RenderState {
    /// Region whose collection is displayed
    pub region: Option<RegionKey>,
    /// Drawn features by way id
    pub features: HashMap<u64, DisplayedFeature>,
    /// Way ids in draw order
    pub order: Vec<u64>,
    pub selected: Option<u64>,
    pub visibility: BucketVisibility,
    pub zoom: f64,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            region: None,
            features: HashMap::new(),
            order: Vec::new(),
            selected: None,
            visibility: BucketVisibility::default(),
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl RenderState {
    pub fn feature(&self, id: u64) -> Option<&RoadFeature> {
        self.features.get(&id).map(|d| &d.feature)
    }

    /// Counts over the current working copy.
    pub fn counts(&self) -> RoadCounts {
        RoadCounts::tally(self.order.iter().filter_map(|id| self.feature(*id)))
    }

    pub fn is_selected(&self, id: u64) -> bool {
        self.selected == Some(id)
    }
}
