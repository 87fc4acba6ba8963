//! Drawing surface abstraction.

use std::collections::HashMap;

use super::style::RoadStyle;
use crate::region::BoundingBox;
use crate::road::LatLon;

/// Identifier of a drawn line.
pub type HandleId = u64;

/// The map operations the render engine needs.
pub trait MapCanvas: Send {
    /// Draw a polyline and return its handle.
    fn draw_line(&mut self, geometry: &[LatLon], style: &RoadStyle) -> HandleId;

    /// Restyle a drawn line. Returns `false` for an unknown handle.
    fn set_style(&mut self, handle: HandleId, style: &RoadStyle) -> bool;

    /// Remove a drawn line. Returns `false` for an unknown handle.
    fn remove(&mut self, handle: HandleId) -> bool;

    fn fit_bounds(&mut self, bbox: &BoundingBox);
}

/// A line held by [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnLine {
    pub geometry: Vec<LatLon>,
    pub style: RoadStyle,
}

/// In-memory canvas that keeps the current style of every line.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    next_handle: HandleId,
    lines: HashMap<HandleId, DrawnLine>,
    bounds: Option<BoundingBox>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, handle: HandleId) -> Option<&DrawnLine> {
        self.lines.get(&handle)
    }

    pub fn style(&self, handle: HandleId) -> Option<RoadStyle> {
        self.lines.get(&handle).map(|l| l.style)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines with non-zero opacity.
    pub fn visible_count(&self) -> usize {
        self.lines.values().filter(|l| l.style.opacity > 0.0).count()
    }

    /// Last bounds the view was fitted to.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }
}

impl MapCanvas for RecordingCanvas {
    fn draw_line(&mut self, geometry: &[LatLon], style: &RoadStyle) -> HandleId {
        self.next_handle += 1;
        self.lines.insert(
            self.next_handle,
            DrawnLine {
                geometry: geometry.to_vec(),
                style: *style,
            },
        );
        self.next_handle
    }

    fn set_style(&mut self, handle: HandleId, style: &RoadStyle) -> bool {
        match self.lines.get_mut(&handle) {
            Some(line) => {
                line.style = *style;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, handle: HandleId) -> bool {
        self.lines.remove(&handle).is_some()
    }

    fn fit_bounds(&mut self, bbox: &BoundingBox) {
        self.bounds = Some(*bbox);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::style::{GOOD_STYLE, POOR_STYLE};

    fn line() -> Vec<LatLon> {
        vec![LatLon::new(50.0, 17.0), LatLon::new(50.1, 17.1)]
    }

    #[test]
    fn test_draw_restyle_remove() {
        let mut canvas = RecordingCanvas::new();
        let a = canvas.draw_line(&line(), &GOOD_STYLE);
        let b = canvas.draw_line(&line(), &GOOD_STYLE);
        assert_ne!(a, b);
        assert_eq!(canvas.len(), 2);

        assert!(canvas.set_style(a, &POOR_STYLE));
        assert_eq!(canvas.style(a), Some(POOR_STYLE));

        assert!(canvas.remove(a));
        assert!(!canvas.remove(a));
        assert!(!canvas.set_style(a, &GOOD_STYLE));
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn test_visible_count() {
        let mut canvas = RecordingCanvas::new();
        let a = canvas.draw_line(&line(), &GOOD_STYLE);
        canvas.draw_line(&line(), &GOOD_STYLE);
        canvas.set_style(a, &GOOD_STYLE.with_opacity(0.0));
        assert_eq!(canvas.visible_count(), 1);
    }
}
