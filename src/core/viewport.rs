use crate::core::constants::TILE_SIZE;
use crate::core::geo::{LatLng, Point};
use crate::traits::CoordinateTransform;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Web Mercator projection constants
const EARTH_RADIUS: f64 = 6378137.0;

/// Manages the current view of the map: center, zoom, and screen dimensions.
///
/// Three pixel spaces are involved:
/// * projected pixels: Web Mercator at the current zoom, origin at the world's top-left
/// * layer pixels: projected pixels relative to the origin fixed at the last view reset
/// * container pixels: what the user sees, origin at the viewport's top-left
///
/// A view reset realigns layer and container space; panning only shifts
/// `pane_offset`, which is what separates the two in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
    /// Projected pixel of the layer origin, fixed at the last view reset
    pixel_origin: Point,
    /// Offset of the layer pane inside the container accumulated by panning
    pane_offset: Point,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let mut viewport = Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
            pixel_origin: Point::default(),
            pane_offset: Point::default(),
        };
        viewport.reset();
        viewport
    }

    /// Sets the center and resets the view
    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(LatLng::clamp_lat(center.lat), center.lng);
        self.reset();
    }

    /// Sets the zoom level, clamping to valid range, and resets the view
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.reset();
    }

    /// Sets the viewport size and resets the view
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
        self.reset();
    }

    /// Gets the layer origin in projected pixels
    pub fn pixel_origin(&self) -> Point {
        self.pixel_origin
    }

    /// Gets the current pane offset accumulated since the last reset
    pub fn pane_offset(&self) -> Point {
        self.pane_offset
    }

    fn reset(&mut self) {
        let half = self.size.multiply(0.5);
        self.pixel_origin = self.project(&self.center).subtract(&half).floor();
        self.pane_offset = Point::default();
    }

    /// Projects a LatLng to world pixel coordinates at the current zoom level
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        let scale = TILE_SIZE as f64 * 2_f64.powf(self.zoom);

        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = (PI / 4.0 + LatLng::clamp_lat(lat_lng.lat).to_radians() / 2.0)
            .tan()
            .ln()
            * EARTH_RADIUS;

        let pixel_x = (x + PI * EARTH_RADIUS) / (2.0 * PI * EARTH_RADIUS) * scale;
        let pixel_y = (-y + PI * EARTH_RADIUS) / (2.0 * PI * EARTH_RADIUS) * scale;

        Point::new(pixel_x, pixel_y)
    }

    /// Unprojects world pixel coordinates back to LatLng at the current zoom level
    pub fn unproject(&self, pixel: &Point) -> LatLng {
        let scale = TILE_SIZE as f64 * 2_f64.powf(self.zoom);

        let x = (pixel.x / scale) * (2.0 * PI * EARTH_RADIUS) - PI * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - (pixel.y / scale) * (2.0 * PI * EARTH_RADIUS);

        let lng = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();

        LatLng::new(lat, lng)
    }

    /// Converts LatLng to layer point (relative to the pixel origin)
    pub fn lat_lng_to_layer_point(&self, lat_lng: &LatLng) -> Point {
        self.project(lat_lng).subtract(&self.pixel_origin)
    }

    /// Converts layer point back to LatLng
    pub fn layer_point_to_lat_lng(&self, point: &Point) -> LatLng {
        self.unproject(&point.add(&self.pixel_origin))
    }

    pub fn layer_point_to_container_point(&self, point: &Point) -> Point {
        point.add(&self.pane_offset)
    }

    pub fn container_point_to_layer_point(&self, point: &Point) -> Point {
        point.subtract(&self.pane_offset)
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_container_point(&self, lat_lng: &LatLng) -> Point {
        self.layer_point_to_container_point(&self.lat_lng_to_layer_point(lat_lng))
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn container_point_to_lat_lng(&self, point: &Point) -> LatLng {
        self.layer_point_to_lat_lng(&self.container_point_to_layer_point(point))
    }

    /// Pans the view by `delta` container pixels without resetting it.
    /// Positive x moves the view right, so content shifts left.
    pub fn pan_by(&mut self, delta: Point) {
        self.pane_offset = self.pane_offset.subtract(&delta);
        let middle = self.size.multiply(0.5);
        self.center = self.container_point_to_lat_lng(&middle);
    }
}

impl CoordinateTransform for Viewport {
    fn size(&self) -> Point {
        self.size
    }

    fn lat_lng_to_container_point(&self, lat_lng: &LatLng) -> Point {
        Viewport::lat_lng_to_container_point(self, lat_lng)
    }

    fn container_point_to_layer_point(&self, point: &Point) -> Point {
        Viewport::container_point_to_layer_point(self, point)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}
