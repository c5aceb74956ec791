use crate::{
    core::{
        bounds::Bounds,
        constants::{MARKER_ICON_SIZE, MARKER_POPUP_ANCHOR},
        geo::{LatLng, Point},
    },
    ui::popup::Popup,
};
use serde::{Deserialize, Serialize};

/// A point of interest drawn with an icon anchored at its bottom-center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    id: String,
    position: LatLng,
    icon_size: Point,
    popup_anchor: Point,
    popup: Option<Popup>,
}

impl Marker {
    pub fn new(id: impl Into<String>, position: LatLng) -> Self {
        Self {
            id: id.into(),
            position,
            icon_size: Point::new(MARKER_ICON_SIZE.0, MARKER_ICON_SIZE.1),
            popup_anchor: Point::new(MARKER_POPUP_ANCHOR.0, MARKER_POPUP_ANCHOR.1),
            popup: None,
        }
    }

    pub fn with_icon_size(mut self, width: f64, height: f64) -> Self {
        self.icon_size = Point::new(width, height);
        self
    }

    pub fn with_popup_anchor(mut self, anchor: Point) -> Self {
        self.popup_anchor = anchor;
        self
    }

    pub fn with_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn icon_size(&self) -> Point {
        self.icon_size
    }

    pub fn popup_anchor(&self) -> Point {
        self.popup_anchor
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// Screen box of the icon when the marker projects to `point`
    pub fn marker_box(&self, point: Point) -> Bounds {
        marker_box(point, self.icon_size)
    }
}

/// Icon box anchored bottom-center at `point`
pub fn marker_box(point: Point, icon_size: Point) -> Bounds {
    let half_width = icon_size.x / 2.0;
    Bounds::from_coords(
        point.x - half_width,
        point.y - icon_size.y,
        point.x + half_width,
        point.y,
    )
}
