//! Where to draw a marker follower.
//!
//! The placer is a pure function of the current geometry: viewport size,
//! the marker's container point and icon size, the open popup's box, the
//! follower's own size and the padding. It keeps no state between calls.
//!
//! ```text
//!           <---> padding (should not exceed half the marker width)
//! +---+-----+---+ ^
//! R B |  B  | B L | padding (should not exceed half the marker height)
//! +---+-----+---+ v
//! |   |     |   |     +---+  Bottom placement: the follower hangs
//! | R | hide| L |     | M |  from the marker's bottom edge.
//! |   |     |   |     +-*-+
//! +---+-----+---+   +---*---+
//! R T |  T  | T L   |   F   |
//! +---+-----+---+   +-------+
//! ```

use crate::{
    core::{bounds::Bounds, geo::Point},
    layers::marker::marker_box,
    traits::CoordinateTransform,
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// Margins of the comfort rectangle, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Padding {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Half the marker width on the sides, half its height above and below
    pub fn for_marker(marker_size: Point) -> Self {
        let half_width = marker_size.x / 2.0;
        let half_height = marker_size.y / 2.0;
        Self::new(half_width, half_width, half_height, half_height)
    }

    /// Describes why this padding can make placement inconsistent, if it can.
    ///
    /// Negative margins, or margins wider than half the marker, let the hidden
    /// test and the side selection disagree about where the marker is.
    pub fn check_against(&self, marker_size: Point) -> Option<String> {
        let half_width = marker_size.x / 2.0;
        let half_height = marker_size.y / 2.0;
        let sides = [
            ("left", self.left, half_width),
            ("right", self.right, half_width),
            ("top", self.top, half_height),
            ("bottom", self.bottom, half_height),
        ];

        let problems: Vec<String> = sides
            .iter()
            .filter_map(|(side, value, limit)| {
                if *value < 0.0 {
                    Some(format!("{} padding {} is negative", side, value))
                } else if value > limit {
                    Some(format!(
                        "{} padding {} exceeds half the marker size ({})",
                        side, value, limit
                    ))
                } else {
                    None
                }
            })
            .collect();

        if problems.is_empty() {
            None
        } else {
            Some(problems.join(", "))
        }
    }
}

/// Edge of the marker the follower is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Marker is above the viewport; follower hangs below it
    Bottom,
    /// Marker is below the viewport; follower sits on top of it
    Top,
    /// Marker is left of the viewport; follower sits to its right
    Right,
    /// Marker is right of the viewport; follower sits to its left
    Left,
}

/// Outcome of a placement run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// The marker is visible enough; hide the follower
    Hidden,
    /// Show the follower with its top-left corner at `(x, y)`
    Visible { x: f64, y: f64, side: Side },
}

impl Placement {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Placement::Hidden)
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Placement::Hidden => None,
            Placement::Visible { side, .. } => Some(*side),
        }
    }

    /// Moves a container-space placement into the layer space elements are positioned in
    pub fn to_layer<T: CoordinateTransform + ?Sized>(&self, transform: &T) -> Placement {
        match *self {
            Placement::Hidden => Placement::Hidden,
            Placement::Visible { x, y, side } => {
                let layer = transform.container_point_to_layer_point(&Point::new(x, y));
                Placement::Visible {
                    x: layer.x,
                    y: layer.y,
                    side,
                }
            }
        }
    }
}

/// Geometry sampled from the map for one placement run, in container pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementInput {
    pub viewport_size: Point,
    /// Projected marker position; the icon's bottom-center
    pub marker_point: Point,
    pub marker_size: Point,
    /// Box of the marker's popup while it is open
    pub popup_box: Option<Bounds>,
    pub follower_size: Point,
    pub padding: Padding,
}

/// Decides whether and where a follower is shown
#[derive(Debug, Clone, Copy, Default)]
pub struct FollowerPlacer;

impl FollowerPlacer {
    pub fn new() -> Self {
        Self
    }

    /// Computes the placement in container space.
    ///
    /// Fails with [`MapError::InvalidPaddingConfiguration`] when the marker is
    /// neither in the comfort rectangle nor on any side of it, which only
    /// happens with inconsistent padding or a popup much wider than the
    /// viewport margin.
    pub fn place(&self, input: &PlacementInput) -> Result<Placement> {
        let marker = marker_box(input.marker_point, input.marker_size);

        // The popup sits above the marker: it may widen the box and raise its
        // top, never lower its bottom.
        let working = match input.popup_box {
            Some(popup) => {
                let mut merged = marker.union(&popup);
                merged.max.y = marker.bottom();
                merged
            }
            None => marker,
        };

        let width = input.viewport_size.x;
        let height = input.viewport_size.y;
        let padding = input.padding;
        let comfort = Bounds::from_size(input.viewport_size).inset(
            padding.left,
            padding.top,
            padding.right,
            padding.bottom,
        );

        if working.overlaps_strict(&comfort) {
            return Ok(Placement::Hidden);
        }

        let follower_width = input.follower_size.x;
        let follower_height = input.follower_size.y;
        let marker_x = input.marker_point.x;
        let marker_y = input.marker_point.y;

        let inside = marker.right() > 0.0 && marker.left() < width;
        let (side, x, y) = if inside && working.bottom() <= padding.top {
            (Side::Bottom, marker_x - follower_width / 2.0, working.bottom())
        } else if inside && working.top() >= height - padding.bottom {
            (
                Side::Top,
                marker_x - follower_width / 2.0,
                working.top() - follower_height,
            )
        } else if working.right() <= padding.left {
            (Side::Right, working.right(), marker_y - follower_height / 2.0)
        } else if working.left() >= width - padding.right {
            (
                Side::Left,
                working.left() - follower_width,
                marker_y - follower_height / 2.0,
            )
        } else {
            return Err(MapError::InvalidPaddingConfiguration {
                reason: format!(
                    "marker box {:?} is outside the comfort rectangle {:?} but on none of its sides",
                    working, comfort
                ),
            });
        };

        Ok(Placement::Visible {
            x: limit_to_range(x, 0.0, width - follower_width),
            y: limit_to_range(y, 0.0, height - follower_height),
            side,
        })
    }
}

/// Like `f64::clamp` but tolerates `upper < lower` (follower larger than the view)
fn limit_to_range(value: f64, lower: f64, upper: f64) -> f64 {
    value.max(lower).min(upper)
}
