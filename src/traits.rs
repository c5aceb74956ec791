//! Shared trait abstractions for the seams between plugins and the map

use crate::core::geo::{LatLng, Point};

/// Coordinate-space conversions a plugin needs from whatever hosts it.
///
/// Container space has its origin at the top-left of the visible map, layer
/// space is what overlay elements are absolutely positioned in.
pub trait CoordinateTransform {
    /// Size of the visible map in container pixels
    fn size(&self) -> Point;

    /// Transform geographic coordinates to container pixel coordinates
    fn lat_lng_to_container_point(&self, lat_lng: &LatLng) -> Point;

    /// Transform container pixel coordinates to layer pixel coordinates
    fn container_point_to_layer_point(&self, point: &Point) -> Point;
}
