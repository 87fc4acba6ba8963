//! Road rendering: bucket styles, zoom fading, selection and local edits.

mod canvas;
mod engine;
mod state;
mod style;

pub use canvas::{DrawnLine, HandleId, MapCanvas, RecordingCanvas};
pub use engine::{PendingEdit, RenderEngine};
pub use state::{BucketVisibility, DisplayedFeature, RenderState, RoadCounts};
pub use style::{
    bucket_style, RenderConfig, RoadStyle, DEFAULT_FADE_SPAN, DEFAULT_FADE_START_ZOOM,
    DEFAULT_MIN_OPACITY, DEFAULT_MIN_VISIBLE_ZOOM, DEFAULT_ZOOM, EXCELLENT_STYLE, GOOD_STYLE,
    HIGHLIGHT_STYLE, POOR_STYLE, UNKNOWN_STYLE,
};
