//! Line styles and zoom-dependent opacity.

use crate::road::QualityBucket;

/// Visual attributes of a drawn road.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadStyle {
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    /// Dash pattern, `None` for a solid line
    pub dash: Option<&'static str>,
}

impl RoadStyle {
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn is_dashed(&self) -> bool {
        self.dash.is_some()
    }
}

pub const EXCELLENT_STYLE: RoadStyle = RoadStyle {
    color: "#000000",
    weight: 3.0,
    opacity: 0.8,
    dash: None,
};

pub const GOOD_STYLE: RoadStyle = RoadStyle {
    color: "#000000",
    weight: 3.0,
    opacity: 0.8,
    dash: Some("5, 5"),
};

pub const POOR_STYLE: RoadStyle = RoadStyle {
    color: "#dc2626",
    weight: 3.0,
    opacity: 0.8,
    dash: None,
};

pub const UNKNOWN_STYLE: RoadStyle = RoadStyle {
    color: "#2563eb",
    weight: 3.0,
    opacity: 0.6,
    dash: None,
};

/// Style of the selected road.
pub const HIGHLIGHT_STYLE: RoadStyle = RoadStyle {
    color: "#8b5cf6",
    weight: 4.0,
    opacity: 1.0,
    dash: None,
};

/// Base style for a quality bucket.
pub fn bucket_style(bucket: QualityBucket) -> RoadStyle {
    match bucket {
        QualityBucket::Excellent => EXCELLENT_STYLE,
        QualityBucket::Good => GOOD_STYLE,
        QualityBucket::Poor => POOR_STYLE,
        QualityBucket::Unknown => UNKNOWN_STYLE,
    }
}

/// Default minimum zoom at which roads are drawn at all.
pub const DEFAULT_MIN_VISIBLE_ZOOM: f64 = 7.0;

/// Default zoom at which fading in starts.
pub const DEFAULT_FADE_START_ZOOM: f64 = 8.0;

/// Default number of zoom levels over which roads fade to full opacity.
pub const DEFAULT_FADE_SPAN: f64 = 4.0;

/// Default opacity floor once roads are visible.
pub const DEFAULT_MIN_OPACITY: f64 = 0.3;

/// Initial zoom of a fresh engine.
pub const DEFAULT_ZOOM: f64 = 8.0;

/// Visibility thresholds for the render engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub min_visible_zoom: f64,
    pub fade_start_zoom: f64,
    pub fade_span: f64,
    pub min_opacity: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_visible_zoom: DEFAULT_MIN_VISIBLE_ZOOM,
            fade_start_zoom: DEFAULT_FADE_START_ZOOM,
            fade_span: DEFAULT_FADE_SPAN,
            min_opacity: DEFAULT_MIN_OPACITY,
        }
    }
}

impl RenderConfig {
    pub fn with_min_visible_zoom(mut self, zoom: f64) -> Self {
        self.min_visible_zoom = zoom;
        self
    }

    pub fn with_fade(mut self, start_zoom: f64, span: f64) -> Self {
        self.fade_start_zoom = start_zoom;
        self.fade_span = span;
        self
    }

    pub fn with_min_opacity(mut self, opacity: f64) -> Self {
        self.min_opacity = opacity;
        self
    }

    /// Opacity multiplier at `zoom`: zero below the visibility threshold,
    /// otherwise a linear fade clamped to `[min_opacity, 1]`.
    pub fn zoom_factor(&self, zoom: f64) -> f64 {
        if zoom < self.min_visible_zoom {
            return 0.0;
        }
        let span = if self.fade_span > 0.0 { self.fade_span } else { 1.0 };
        ((zoom - self.fade_start_zoom) / span).clamp(self.min_opacity.min(1.0), 1.0)
    }

    /// Check the thresholds are usable.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_opacity) {
            return Err(format!(
                "min_opacity must be between 0 and 1, got {}",
                self.min_opacity
            ));
        }
        if self.fade_span <= 0.0 {
            return Err(format!("fade_span must be positive, got {}", self.fade_span));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_bucket_styles() {
        assert_eq!(bucket_style(QualityBucket::Excellent).color, "#000000");
        assert!(!bucket_style(QualityBucket::Excellent).is_dashed());
        assert_eq!(bucket_style(QualityBucket::Good).dash, Some("5, 5"));
        assert_eq!(bucket_style(QualityBucket::Poor).color, "#dc2626");
        assert!(close(bucket_style(QualityBucket::Unknown).opacity, 0.6));
        assert!(close(HIGHLIGHT_STYLE.weight, 4.0));
    }

    #[test]
    fn test_zoom_factor_hidden_below_threshold() {
        let config = RenderConfig::default();
        assert_eq!(config.zoom_factor(6.9), 0.0);
        assert_eq!(config.zoom_factor(0.0), 0.0);
    }

    #[test]
    fn test_zoom_factor_fades_in() {
        let config = RenderConfig::default();
        assert!(close(config.zoom_factor(7.0), 0.3));
        assert!(close(config.zoom_factor(8.0), 0.3));
        assert!(close(config.zoom_factor(10.0), 0.5));
        assert!(close(config.zoom_factor(12.0), 1.0));
        assert!(close(config.zoom_factor(18.0), 1.0));
    }

    #[test]
    fn test_custom_thresholds() {
        let config = RenderConfig::default()
            .with_min_visible_zoom(5.0)
            .with_fade(6.0, 2.0)
            .with_min_opacity(0.1);
        assert!(close(config.zoom_factor(5.0), 0.1));
        assert!(close(config.zoom_factor(7.0), 0.5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(RenderConfig::default().with_min_opacity(1.5).validate().is_err());
        assert!(RenderConfig::default().with_fade(8.0, 0.0).validate().is_err());
    }
}
