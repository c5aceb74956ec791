//! Core constants derived from Leaflet defaults and common web-map conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Marker icon default size (regular PNG).
pub const MARKER_ICON_SIZE: (f64, f64) = (25.0, 41.0);

/// Where popups attach relative to the marker's anchor point.
pub const MARKER_POPUP_ANCHOR: (f64, f64) = (1.0, -34.0);

/// Popup tip offset from its anchor.
pub const POPUP_OFFSET: (f64, f64) = (0.0, 7.0);

/// Popups never grow wider than this.
pub const POPUP_MAX_WIDTH: f64 = 300.0;

/// Popup content padding on every side.
pub const POPUP_PADDING: f64 = 8.0;

/// Approximate advance of one glyph in the default UI font.
pub const GLYPH_WIDTH: f64 = 7.0;

/// Line height of the default UI font.
pub const LINE_HEIGHT: f64 = 16.0;

/// Padding around the text of a default follower element.
pub const FOLLOWER_PADDING: f64 = 4.0;

/// CSS-like class assigned to followers created by the plugin.
pub const FOLLOWER_CLASS: &str = "maplet-marker-follower";
