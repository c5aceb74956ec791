use crate::core::{
    bounds::Bounds,
    constants::{POPUP_MAX_WIDTH, POPUP_OFFSET, POPUP_PADDING},
    geo::Point,
};
use crate::ui::element::measure_text;
use serde::{Deserialize, Serialize};

/// A text bubble anchored above a marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub content: String,
    /// Offset of the popup tip from its anchor
    pub offset: Point,
    pub max_width: f64,
    pub padding: f64,
}

impl Popup {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            offset: Point::new(POPUP_OFFSET.0, POPUP_OFFSET.1),
            max_width: POPUP_MAX_WIDTH,
            padding: POPUP_PADDING,
        }
    }

    pub fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = max_width;
        self
    }

    /// Measured size of the popup container including padding
    pub fn size(&self) -> Point {
        let text = measure_text(&self.content, Some(self.max_width - self.padding * 2.0));
        Point::new(text.x + self.padding * 2.0, text.y + self.padding * 2.0)
    }

    /// Horizontal position of the container's left edge relative to the marker point
    pub fn container_left(&self, anchor: Point) -> f64 {
        -(self.size().x / 2.0).round() + self.offset.x + anchor.x
    }

    /// Distance from the marker point up to the container's bottom edge
    pub fn container_bottom(&self, anchor: Point) -> f64 {
        -(self.offset.y + anchor.y)
    }

    /// Bounding box of the open popup in the same space as `marker_point`.
    ///
    /// `anchor` is the marker's popup anchor relative to its own point.
    pub fn popup_box(&self, marker_point: Point, anchor: Point) -> Bounds {
        let size = self.size();
        let left = marker_point.x + self.container_left(anchor);
        let bottom = marker_point.y - self.container_bottom(anchor);
        Bounds::from_coords(left, bottom - size.y, left + size.x, bottom)
    }
}
