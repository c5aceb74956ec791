use crate::ui::element::ElementId;

/// Map event types that can be emitted by the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The view was reset: zoom, size or a hard recenter
    ViewReset,
    /// The view is being panned
    Move,
    /// A marker's popup was opened
    PopupOpen { marker_id: String },
    /// A marker's popup was closed
    PopupClose { marker_id: String },
    /// An overlay element was clicked
    ElementClick { element: ElementId },
}

/// Payload-free discriminant of [`MapEvent`], used for subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    ViewReset,
    Move,
    PopupOpen,
    PopupClose,
    ElementClick,
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::ViewReset => MapEventKind::ViewReset,
            MapEvent::Move => MapEventKind::Move,
            MapEvent::PopupOpen { .. } => MapEventKind::PopupOpen,
            MapEvent::PopupClose { .. } => MapEventKind::PopupClose,
            MapEvent::ElementClick { .. } => MapEventKind::ElementClick,
        }
    }
}

impl std::fmt::Display for MapEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapEventKind::ViewReset => write!(f, "viewreset"),
            MapEventKind::Move => write!(f, "move"),
            MapEventKind::PopupOpen => write!(f, "popupopen"),
            MapEventKind::PopupClose => write!(f, "popupclose"),
            MapEventKind::ElementClick => write!(f, "click"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind() {
        assert_eq!(MapEvent::Move.kind(), MapEventKind::Move);
        let open = MapEvent::PopupOpen {
            marker_id: "m".to_string(),
        };
        assert_eq!(open.kind(), MapEventKind::PopupOpen);
        assert_eq!(
            MapEvent::ElementClick {
                element: ElementId(3)
            }
            .kind(),
            MapEventKind::ElementClick
        );
    }

    #[test]
    fn test_kind_display_matches_leaflet_names() {
        assert_eq!(MapEventKind::ViewReset.to_string(), "viewreset");
        assert_eq!(MapEventKind::PopupOpen.to_string(), "popupopen");
    }
}
