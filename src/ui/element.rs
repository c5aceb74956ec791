use crate::core::constants::{GLYPH_WIDTH, LINE_HEIGHT};
use crate::core::geo::Point;
use crate::prelude::HashMap;
use serde::{Deserialize, Serialize};

/// Handle to an element living in an [`OverlayPane`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// Measures single-line-per-paragraph text with the default UI font metrics
pub fn measure_text(text: &str, max_width: Option<f64>) -> Point {
    if text.is_empty() {
        return Point::default();
    }

    let widest = text
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0) as f64
        * GLYPH_WIDTH;
    let lines = text.lines().count().max(1) as f64;

    match max_width {
        Some(limit) if widest > limit => {
            // Wrap: every overflowing line costs extra rows
            let rows: f64 = text
                .lines()
                .map(|line| ((line.chars().count() as f64 * GLYPH_WIDTH) / limit).ceil().max(1.0))
                .sum();
            Point::new(limit, rows * LINE_HEIGHT)
        }
        _ => Point::new(widest, lines * LINE_HEIGHT),
    }
}

/// A positioned box in the overlay pane, the map's stand-in for a DOM node.
///
/// `position` is the top-left corner in layer space. Size is intrinsic:
/// measured from text for created elements, or given by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub class: String,
    pub text: Option<String>,
    pub size: Point,
    pub position: Point,
    pub visible: bool,
    /// Name of the plugin listening for clicks on this element
    pub click_listener: Option<String>,
}

impl Element {
    pub fn new(class: impl Into<String>, size: Point) -> Self {
        Self {
            class: class.into(),
            text: None,
            size,
            position: Point::default(),
            visible: true,
            click_listener: None,
        }
    }

    /// Creates an element sized to fit `text` plus `padding` on every side
    pub fn with_text(class: impl Into<String>, text: impl Into<String>, padding: f64) -> Self {
        let text = text.into();
        let content = measure_text(&text, None);
        let size = if text.is_empty() {
            content
        } else {
            Point::new(content.x + padding * 2.0, content.y + padding * 2.0)
        };
        Self {
            text: Some(text),
            ..Self::new(class, size)
        }
    }
}

/// Owns the elements drawn above the map layers
#[derive(Debug, Default)]
pub struct OverlayPane {
    elements: HashMap<ElementId, Element>,
    next_id: u64,
}

impl OverlayPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, element);
        id
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.elements.remove(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
