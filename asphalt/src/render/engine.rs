//! Reconciles the domain feature set with what is drawn on the canvas.
//!
//! The engine owns a working copy of the displayed features. Every change
//! (new collection, zoom, bucket toggle, selection, local edit) is applied
//! by restyling drawn lines through [`MapCanvas`], never by redrawing.

use tracing::{debug, info, trace};

use super::canvas::{HandleId, MapCanvas};
use super::state::{DisplayedFeature, RenderState, RoadCounts};
use super::style::{bucket_style, RenderConfig, RoadStyle, HIGHLIGHT_STYLE};
use crate::osm::{AccessTokenSource, EditError, EditGateway, EditReceipt};
use crate::region::RegionKey;
use crate::road::{
    is_valid_smoothness, normalize_smoothness, LatLon, QualityBucket, RegionFeatureCollection,
    RoadFeature,
};

/// A validated edit ready to be sent to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    pub token: String,
    pub way_id: u64,
    pub smoothness: String,
}

/// Road render engine over a drawing surface.
pub struct RenderEngine<C: MapCanvas> {
    canvas: C,
    config: RenderConfig,
    state: RenderState,
}

impl<C: MapCanvas> RenderEngine<C> {
    pub fn new(canvas: C, config: RenderConfig) -> Self {
        Self {
            canvas,
            config,
            state: RenderState::default(),
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    /// Region whose collection is displayed.
    pub fn region(&self) -> Option<&RegionKey> {
        self.state.region.as_ref()
    }

    /// Replace the display with `collection`.
    ///
    /// Features that cannot be drawn are skipped. Returns counts of what
    /// was drawn.
    pub fn display(&mut self, collection: &RegionFeatureCollection) -> RoadCounts {
        self.clear();
        self.state.region = Some(collection.source_region.clone());

        let mut counts = RoadCounts::default();
        let mut skipped = 0usize;

        for feature in &collection.features {
            if !is_renderable(feature) {
                trace!(
                    way_id = feature.id,
                    points = feature.geometry.len(),
                    "Skipping malformed feature"
                );
                skipped += 1;
                continue;
            }
            if self.state.features.contains_key(&feature.id) {
                trace!(way_id = feature.id, "Skipping duplicate feature");
                skipped += 1;
                continue;
            }

            let bucket = feature.quality_bucket();
            let handle = self.canvas.draw_line(&feature.geometry, &bucket_style(bucket));
            self.state.features.insert(
                feature.id,
                DisplayedFeature {
                    feature: feature.clone(),
                    handle,
                },
            );
            self.state.order.push(feature.id);
            counts.add(bucket);
        }

        self.recompute_visibility();

        info!(
            region = %collection.source_region,
            total = counts.total,
            excellent = counts.excellent,
            good = counts.good,
            poor = counts.poor,
            unknown = counts.unknown,
            skipped = skipped,
            "Roads displayed"
        );
        counts
    }

    /// Remove every drawn feature and clear the selection.
    pub fn clear(&mut self) {
        self.clear_selection();
        for id in self.state.order.drain(..) {
            if let Some(displayed) = self.state.features.remove(&id) {
                self.canvas.remove(displayed.handle);
            }
        }
        self.state.features.clear();
        self.state.region = None;
    }

    /// Fit the view to a region's bounding box.
    pub fn zoom_to_region(&mut self, key: &RegionKey) -> bool {
        match key.region() {
            Some(region) => {
                self.canvas.fit_bounds(&region.bbox);
                true
            }
            None => {
                debug!(region = %key, "No bounds for region");
                false
            }
        }
    }

    pub fn is_visible(&self, bucket: QualityBucket) -> bool {
        self.state.visibility.is_visible(bucket)
    }

    /// Show or hide one bucket.
    pub fn set_visibility(&mut self, bucket: QualityBucket, visible: bool) {
        self.state.visibility.set(bucket, visible);
        debug!(bucket = %bucket, visible = visible, "Bucket visibility changed");
        self.recompute_visibility();
    }

    /// Zoom-end event from the map.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.state.zoom = zoom;
        self.recompute_visibility();
    }

    /// Restyle every drawn feature from zoom, visibility and selection.
    pub fn recompute_visibility(&mut self) {
        for index in 0..self.state.order.len() {
            let id = self.state.order[index];
            self.restyle(id);
        }
    }

    /// Select one feature exclusively. Unknown ids leave the selection as is.
    pub fn select(&mut self, id: u64) -> bool {
        if !self.state.features.contains_key(&id) {
            debug!(way_id = id, "Select ignored, feature not displayed");
            return false;
        }

        let previous = self.state.selected.replace(id);
        if let Some(prev) = previous.filter(|p| *p != id) {
            self.restyle(prev);
        }
        self.restyle(id);
        true
    }

    pub fn clear_selection(&mut self) {
        if let Some(prev) = self.state.selected.take() {
            self.restyle(prev);
        }
    }

    pub fn selected(&self) -> Option<&RoadFeature> {
        self.state.selected.and_then(|id| self.state.feature(id))
    }

    /// First and last point of the selected road.
    pub fn endpoints(&self) -> Option<(LatLon, LatLon)> {
        self.selected().and_then(RoadFeature::endpoints)
    }

    pub fn feature(&self, id: u64) -> Option<&RoadFeature> {
        self.state.feature(id)
    }

    /// Counts over the working copy, including local edits.
    pub fn counts(&self) -> RoadCounts {
        self.state.counts()
    }

    /// Apply a successful remote write to the working copy.
    ///
    /// Restyles the road for its new bucket; a selected road keeps the
    /// highlight. Unknown ids are ignored.
    pub fn apply_optimistic_edit(
        &mut self,
        id: u64,
        smoothness: &str,
        version: Option<u64>,
    ) -> bool {
        let Some(displayed) = self.state.features.get_mut(&id) else {
            debug!(way_id = id, "Optimistic edit ignored, feature not displayed");
            return false;
        };

        displayed.feature.smoothness = normalize_smoothness(smoothness);
        if let Some(version) = version {
            displayed.feature.version = Some(version);
        }
        let bucket = displayed.feature.quality_bucket();

        self.restyle(id);
        debug!(way_id = id, smoothness = smoothness, bucket = %bucket, "Optimistic edit applied");
        true
    }

    /// Check an edit can be submitted and normalize its value.
    pub fn prepare_edit<A: AccessTokenSource + ?Sized>(
        &self,
        tokens: &A,
        id: u64,
        smoothness: &str,
    ) -> Result<PendingEdit, EditError> {
        let token = match tokens.access_token() {
            Some(token) if tokens.is_authenticated() => token,
            _ => return Err(EditError::Unauthenticated),
        };

        let feature = self.state.feature(id).ok_or(EditError::UnknownFeature(id))?;

        let value = normalize_smoothness(smoothness)
            .filter(|v| is_valid_smoothness(v))
            .ok_or_else(|| EditError::InvalidValue(smoothness.to_string()))?;

        if feature.smoothness.as_deref() == Some(value.as_str()) {
            return Err(EditError::Unchanged { way_id: id, value });
        }

        Ok(PendingEdit {
            token,
            way_id: id,
            smoothness: value,
        })
    }

    /// Validate, write through `gateway`, then apply locally.
    ///
    /// Gateway failures are returned unchanged and leave the display alone.
    pub async fn submit_edit<G, A>(
        &mut self,
        gateway: &G,
        tokens: &A,
        id: u64,
        smoothness: &str,
    ) -> Result<EditReceipt, EditError>
    where
        G: EditGateway,
        A: AccessTokenSource + ?Sized,
    {
        let edit = self.prepare_edit(tokens, id, smoothness)?;
        let receipt = gateway
            .update_smoothness(&edit.token, edit.way_id, &edit.smoothness)
            .await?;
        self.apply_optimistic_edit(edit.way_id, &edit.smoothness, Some(receipt.new_version));
        Ok(receipt)
    }

    fn style_for(&self, feature: &RoadFeature) -> RoadStyle {
        if self.state.is_selected(feature.id) {
            return HIGHLIGHT_STYLE;
        }
        let bucket = feature.quality_bucket();
        let base = bucket_style(bucket);
        let shown = if self.state.visibility.is_visible(bucket) {
            1.0
        } else {
            0.0
        };
        base.with_opacity(self.config.zoom_factor(self.state.zoom) * base.opacity * shown)
    }

    fn restyle(&mut self, id: u64) {
        let Some((handle, style)) = self
            .state
            .features
            .get(&id)
            .map(|d| (d.handle, self.style_for(&d.feature)))
        else {
            return;
        };
        self.apply_style(handle, &style);
    }

    fn apply_style(&mut self, handle: HandleId, style: &RoadStyle) {
        if !self.canvas.set_style(handle, style) {
            debug!(handle = handle, "Drawable missing, restyle skipped");
        }
    }
}

/// Whether a feature has a drawable, finite path.
fn is_renderable(feature: &RoadFeature) -> bool {
    feature.is_drawable()
        && feature
            .geometry
            .iter()
            .all(|p| p.lat.is_finite() && p.lon.is_finite())
}
