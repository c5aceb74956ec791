//! Prelude module for common maplet-follower types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use maplet_follower::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    geo::{LatLng, Point},
    map::{Map, PanOptions, PanRequest},
    viewport::Viewport,
};

pub use crate::input::events::{MapEvent, MapEventKind};

pub use crate::layers::marker::Marker;

pub use crate::plugins::{
    base::PluginTrait,
    follower::{marker_follower, FollowerOptions, MarkerFollower},
    placement::{FollowerPlacer, Padding, Placement, PlacementInput, Side},
};

pub use crate::traits::CoordinateTransform;

pub use crate::ui::{
    element::{Element, ElementId, OverlayPane},
    popup::Popup,
};

pub use crate::{Error as MapError, Result};

pub use std::collections::VecDeque;

pub use fxhash::FxHashMap as HashMap;
