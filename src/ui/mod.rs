pub mod element;
pub mod popup;

pub use element::{Element, ElementId, OverlayPane};
pub use popup::Popup;
