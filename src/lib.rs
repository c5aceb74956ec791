//! # maplet-follower
//!
//! A marker follower plugin for maplet maps.
//!
//! When a marker scrolls out of view, a small element is drawn on the edge
//! of the viewport nearest to it; clicking that element pans back to the
//! marker. Placement is a pure function of the current geometry and is
//! recomputed on every view reset, move and popup open/close.

pub mod core;
pub mod input;
pub mod layers;
pub mod plugins;
pub mod prelude;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    geo::{LatLng, Point},
    map::{Map, PanOptions},
    viewport::Viewport,
};

pub use crate::input::events::{MapEvent, MapEventKind};

pub use crate::layers::marker::Marker;

pub use crate::ui::{element::Element, popup::Popup};

pub use crate::plugins::{
    base::PluginTrait,
    follower::{marker_follower, FollowerOptions, MarkerFollower},
    placement::{FollowerPlacer, Padding, Placement, PlacementInput, Side},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// Padding makes the hidden test and side selection disagree
    #[error("Invalid padding configuration: {reason}")]
    InvalidPaddingConfiguration { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Plugin error: {0}")]
    Plugin(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Initializes `env_logger` from the environment; safe to call more than once
#[cfg(feature = "debug")]
pub fn init_logger() {
    let _ = env_logger::builder().try_init();
}
