use crate::{
    core::{
        constants::{FOLLOWER_CLASS, FOLLOWER_PADDING},
        geo::Point,
        map::{Map, PanOptions},
    },
    input::events::{MapEvent, MapEventKind},
    layers::marker::Marker,
    plugins::{
        base::PluginTrait,
        placement::{FollowerPlacer, Padding, Placement, PlacementInput},
    },
    traits::CoordinateTransform,
    ui::element::{Element, ElementId},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Events after which the follower is placed again
const RELOCATE_EVENTS: [MapEventKind; 4] = [
    MapEventKind::ViewReset,
    MapEventKind::Move,
    MapEventKind::PopupOpen,
    MapEventKind::PopupClose,
];

/// Configuration for the marker follower.
///
/// Deserializes from camelCase JSON (`paddingTop`, `strictPadding`, ...).
/// Unset paddings default to half the marker's icon width (left/right) or
/// height (top/bottom).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FollowerOptions {
    pub padding_top: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,
    pub padding_right: Option<f64>,
    /// Reject padding that can make placement inconsistent instead of warning
    pub strict_padding: Option<bool>,
    /// Caller-supplied element; one showing the popup text is created otherwise
    #[serde(skip)]
    pub follower: Option<Element>,
}

impl FollowerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets all four paddings
    pub fn padding(mut self, value: f64) -> Self {
        self.padding_top = Some(value);
        self.padding_bottom = Some(value);
        self.padding_left = Some(value);
        self.padding_right = Some(value);
        self
    }

    pub fn padding_top(mut self, value: f64) -> Self {
        self.padding_top = Some(value);
        self
    }

    pub fn padding_bottom(mut self, value: f64) -> Self {
        self.padding_bottom = Some(value);
        self
    }

    pub fn padding_left(mut self, value: f64) -> Self {
        self.padding_left = Some(value);
        self
    }

    pub fn padding_right(mut self, value: f64) -> Self {
        self.padding_right = Some(value);
        self
    }

    pub fn strict_padding(mut self, strict: bool) -> Self {
        self.strict_padding = Some(strict);
        self
    }

    pub fn follower(mut self, element: Element) -> Self {
        self.follower = Some(element);
        self
    }

    /// Fills unset paddings from `defaults`
    fn resolve_padding(&self, defaults: Padding) -> Padding {
        Padding::new(
            self.padding_left.unwrap_or(defaults.left),
            self.padding_right.unwrap_or(defaults.right),
            self.padding_top.unwrap_or(defaults.top),
            self.padding_bottom.unwrap_or(defaults.bottom),
        )
    }
}

/// Keeps an off-screen marker findable.
///
/// While the marker (and its open popup) stays out of the viewport's comfort
/// rectangle, a small element is shown at the viewport edge nearest to it.
/// Clicking that element pans the map to the marker.
#[derive(Debug)]
pub struct MarkerFollower {
    name: String,
    marker: Marker,
    padding: Padding,
    strict_padding: bool,
    placer: FollowerPlacer,
    /// Element waiting to be inserted; held again after removal
    detached: Option<Element>,
    element: Option<ElementId>,
}

/// Creates a follower for `marker`
pub fn marker_follower(marker: Marker, options: FollowerOptions) -> Result<MarkerFollower> {
    MarkerFollower::new(marker, options)
}

impl MarkerFollower {
    pub fn new(marker: Marker, options: FollowerOptions) -> Result<Self> {
        let padding = options.resolve_padding(Padding::for_marker(marker.icon_size()));
        let strict_padding = options.strict_padding.unwrap_or(false);
        check_padding(&marker, padding, strict_padding)?;

        Ok(Self {
            name: format!("marker-follower:{}", marker.id()),
            marker,
            padding,
            strict_padding,
            placer: FollowerPlacer::new(),
            detached: options.follower,
            element: None,
        })
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// The follower element while attached to a map
    pub fn element_id(&self) -> Option<ElementId> {
        self.element
    }

    pub fn is_attached(&self) -> bool {
        self.element.is_some()
    }

    /// Current configuration as camelCase JSON
    pub fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "paddingTop": self.padding.top,
            "paddingBottom": self.padding.bottom,
            "paddingLeft": self.padding.left,
            "paddingRight": self.padding.right,
            "strictPadding": self.strict_padding,
        })
    }

    /// Attaches this follower to `map`
    pub fn add_to(self, map: &mut Map) -> Result<()> {
        map.add_plugin(Box::new(self))
    }

    /// Updates the configuration from camelCase JSON. Missing keys keep their value.
    ///
    /// An attached follower keeps its position until the next map event; use
    /// [`MarkerFollower::apply_options`] to place it again right away.
    pub fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        let parsed: FollowerOptions = serde_json::from_value(options)?;
        let padding = parsed.resolve_padding(self.padding);
        let strict_padding = parsed.strict_padding.unwrap_or(self.strict_padding);
        check_padding(&self.marker, padding, strict_padding)?;
        self.padding = padding;
        self.strict_padding = strict_padding;
        Ok(())
    }

    /// Like [`MarkerFollower::set_options`], then places the follower again
    /// when attached.
    ///
    /// Reach an attached follower through [`Map::update_plugin`].
    pub fn apply_options(&mut self, options: serde_json::Value, map: &mut Map) -> Result<()> {
        self.set_options(options)?;
        if self.is_attached() {
            self.relocate_or_log(map);
        }
        Ok(())
    }

    /// Computes the placement for the map's current state, in container space
    pub fn compute_placement(&self, map: &Map) -> Result<Placement> {
        let id = self.attached_element()?;
        let element = map
            .overlay_pane()
            .get(id)
            .ok_or_else(|| MapError::Plugin(format!("{}: element {:?} is gone", self.name, id)))?;

        let viewport = map.viewport();
        let marker_point = viewport.lat_lng_to_container_point(&self.marker.position());

        self.placer.place(&PlacementInput {
            viewport_size: CoordinateTransform::size(viewport),
            marker_point,
            marker_size: self.marker.icon_size(),
            popup_box: map.popup_box(self.marker.id(), marker_point),
            follower_size: element.size,
            padding: self.padding,
        })
    }

    /// Places the follower for the map's current state.
    ///
    /// On error the element keeps its previous position and visibility.
    pub fn relocate(&self, map: &mut Map) -> Result<Placement> {
        let placement = self.compute_placement(map)?;
        let layer = placement.to_layer(map.viewport());
        let id = self.attached_element()?;

        let element = map
            .overlay_pane_mut()
            .get_mut(id)
            .ok_or_else(|| MapError::Plugin(format!("{}: element {:?} is gone", self.name, id)))?;
        match layer {
            Placement::Hidden => element.visible = false,
            Placement::Visible { x, y, .. } => {
                element.visible = true;
                element.position = Point::new(x, y);
            }
        }

        log::debug!("{} relocated: {:?}", self.name, placement);
        Ok(placement)
    }

    /// Pans the map to the marker
    pub fn focus_marker(&self, map: &mut Map) {
        map.pan_to(self.marker.position(), PanOptions { animate: true });
    }

    fn attached_element(&self) -> Result<ElementId> {
        self.element
            .ok_or_else(|| MapError::Plugin(format!("{} is not attached to a map", self.name)))
    }

    fn relocate_or_log(&self, map: &mut Map) {
        if let Err(e) = self.relocate(map) {
            log::error!("{}: keeping previous position: {}", self.name, e);
        }
    }
}

/// Default element: the popup's text, or an empty box without a popup
fn create_follower(marker: &Marker) -> Element {
    match marker.popup() {
        Some(popup) => Element::with_text(FOLLOWER_CLASS, popup.content.clone(), FOLLOWER_PADDING),
        None => Element::new(FOLLOWER_CLASS, Point::default()),
    }
}

fn check_padding(marker: &Marker, padding: Padding, strict: bool) -> Result<()> {
    if let Some(reason) = padding.check_against(marker.icon_size()) {
        if strict {
            return Err(MapError::InvalidPaddingConfiguration { reason });
        }
        log::warn!(
            "marker '{}': {}; followers may fail to place",
            marker.id(),
            reason
        );
    }
    Ok(())
}

impl PluginTrait for MarkerFollower {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_add(&mut self, map: &mut Map) -> Result<()> {
        if self.element.is_some() {
            return Err(MapError::Plugin(format!("{} is already attached", self.name)));
        }

        let mut element = self
            .detached
            .take()
            .unwrap_or_else(|| create_follower(&self.marker));
        element.click_listener = Some(self.name.clone());
        // Shown only once a placement succeeds
        element.visible = false;
        self.element = Some(map.overlay_pane_mut().append(element));

        map.on(&self.name, &RELOCATE_EVENTS);
        self.relocate_or_log(map);
        Ok(())
    }

    fn on_remove(&mut self, map: &mut Map) -> Result<()> {
        map.off(&self.name, &RELOCATE_EVENTS);
        if let Some(id) = self.element.take() {
            if let Some(mut element) = map.overlay_pane_mut().remove(id) {
                element.click_listener = None;
                self.detached = Some(element);
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &MapEvent, map: &mut Map) -> Result<()> {
        match event {
            MapEvent::ElementClick { element } => {
                if self.element == Some(*element) {
                    self.focus_marker(map);
                }
            }
            _ => self.relocate_or_log(map),
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::geo::LatLng, ui::popup::Popup};

    fn marker() -> Marker {
        Marker::new("m", LatLng::default()).with_icon_size(20.0, 30.0)
    }

    #[test]
    fn test_default_padding_is_half_icon() {
        let follower = MarkerFollower::new(marker(), FollowerOptions::new()).unwrap();
        assert_eq!(follower.padding(), Padding::new(10.0, 10.0, 15.0, 15.0));
        assert_eq!(follower.name(), "marker-follower:m");
        assert!(!follower.is_attached());
    }

    #[test]
    fn test_explicit_padding_overrides_defaults() {
        let options = FollowerOptions::new().padding_top(4.0).padding_left(2.0);
        let follower = MarkerFollower::new(marker(), options).unwrap();
        assert_eq!(follower.padding(), Padding::new(2.0, 10.0, 4.0, 15.0));
    }

    #[test]
    fn test_options_from_json() {
        let options: FollowerOptions = serde_json::from_value(serde_json::json!({
            "paddingTop": 3.0,
            "paddingRight": 7.5,
        }))
        .unwrap();
        assert_eq!(options.padding_top, Some(3.0));
        assert_eq!(options.padding_right, Some(7.5));
        assert_eq!(options.padding_left, None);
        assert_eq!(options.strict_padding, None);
    }

    #[test]
    fn test_strict_padding_rejects_oversized_padding() {
        let options = FollowerOptions::new().padding(20.0).strict_padding(true);
        let result = MarkerFollower::new(marker(), options);
        assert!(matches!(
            result,
            Err(MapError::InvalidPaddingConfiguration { .. })
        ));
    }

    #[test]
    fn test_lenient_padding_is_accepted() {
        let options = FollowerOptions::new().padding(20.0);
        let follower = marker_follower(marker(), options).unwrap();
        assert_eq!(follower.padding(), Padding::uniform(20.0));
    }

    #[test]
    fn test_set_options_keeps_missing_keys() {
        let mut follower = MarkerFollower::new(marker(), FollowerOptions::new()).unwrap();
        follower
            .set_options(serde_json::json!({ "paddingBottom": 5.0 }))
            .unwrap();
        assert_eq!(follower.padding(), Padding::new(10.0, 10.0, 15.0, 5.0));
        assert_eq!(follower.options()["paddingBottom"], 5.0);
        assert_eq!(follower.options()["strictPadding"], false);
    }

    #[test]
    fn test_set_options_rejects_bad_json() {
        let mut follower = MarkerFollower::new(marker(), FollowerOptions::new()).unwrap();
        let result = follower.set_options(serde_json::json!({ "paddingTop": "wide" }));
        assert!(matches!(result, Err(MapError::Serialization(_))));
        assert_eq!(follower.padding(), Padding::new(10.0, 10.0, 15.0, 15.0));
    }

    #[test]
    fn test_set_options_strict_validation() {
        let mut follower = MarkerFollower::new(marker(), FollowerOptions::new()).unwrap();
        let result = follower.set_options(serde_json::json!({
            "paddingLeft": 50.0,
            "strictPadding": true,
        }));
        assert!(matches!(
            result,
            Err(MapError::InvalidPaddingConfiguration { .. })
        ));
        assert_eq!(follower.padding().left, 10.0);
    }

    #[test]
    fn test_default_follower_shows_popup_text() {
        let with_popup = marker().with_popup(Popup::new("Home"));
        let element = create_follower(&with_popup);
        assert_eq!(element.class, FOLLOWER_CLASS);
        assert_eq!(element.text.as_deref(), Some("Home"));
        assert_eq!(element.size, Point::new(36.0, 24.0));

        let bare = create_follower(&marker());
        assert!(bare.text.is_none());
        assert_eq!(bare.size, Point::default());
    }

    #[test]
    fn test_apply_options_when_detached_only_updates() {
        let mut follower = MarkerFollower::new(marker(), FollowerOptions::new()).unwrap();
        let mut map = Map::default();
        follower
            .apply_options(serde_json::json!({ "paddingTop": 2.0 }), &mut map)
            .unwrap();
        assert_eq!(follower.padding().top, 2.0);
        assert!(map.overlay_pane().is_empty());
    }

    #[test]
    fn test_relocate_requires_attachment() {
        let follower = MarkerFollower::new(marker(), FollowerOptions::new()).unwrap();
        let mut map = Map::default();
        assert!(matches!(
            follower.relocate(&mut map),
            Err(MapError::Plugin(_))
        ));
    }
}
