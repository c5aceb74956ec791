use crate::{
    core::{
        bounds::Bounds,
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    input::events::{MapEvent, MapEventKind},
    layers::marker::Marker,
    plugins::base::PluginTrait,
    prelude::{HashMap, VecDeque},
    ui::{
        element::{ElementId, OverlayPane},
        popup::Popup,
    },
    MapError, Result,
};

/// Options for [`Map::pan_to`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanOptions {
    pub animate: bool,
}

/// The most recent pan request, kept for hosts that drive animations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanRequest {
    pub center: LatLng,
    pub options: PanOptions,
}

/// A popup currently shown on the map, with the anchor of the marker it belongs to
#[derive(Debug, Clone, PartialEq)]
struct OpenPopup {
    popup: Popup,
    anchor: Point,
}

/// The map a plugin is attached to.
///
/// Owns the viewport, the overlay pane, open popups and the plugins with their
/// event subscriptions. Events are dispatched synchronously; an event raised
/// while a handler runs is queued and delivered once that handler returns.
pub struct Map {
    viewport: Viewport,
    overlay_pane: OverlayPane,
    open_popups: HashMap<String, OpenPopup>,
    plugins: HashMap<String, Box<dyn PluginTrait>>,
    /// Subscriptions in registration order
    listeners: Vec<(String, MapEventKind)>,
    pending_events: VecDeque<MapEvent>,
    dispatching: bool,
    last_pan: Option<PanRequest>,
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self::with_viewport(Viewport::new(center, zoom, size))
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            overlay_pane: OverlayPane::new(),
            open_popups: HashMap::default(),
            plugins: HashMap::default(),
            listeners: Vec::new(),
            pending_events: VecDeque::new(),
            dispatching: false,
            last_pan: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn overlay_pane(&self) -> &OverlayPane {
        &self.overlay_pane
    }

    pub fn overlay_pane_mut(&mut self) -> &mut OverlayPane {
        &mut self.overlay_pane
    }

    pub fn size(&self) -> Point {
        self.viewport.size
    }

    /// Recenters and rezooms the map
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.viewport.set_zoom(zoom);
        self.viewport.set_center(center);
        self.fire(MapEvent::ViewReset);
    }

    pub fn set_size(&mut self, size: Point) {
        self.viewport.set_size(size);
        self.fire(MapEvent::ViewReset);
    }

    /// Pans by `delta` container pixels
    pub fn pan_by(&mut self, delta: Point) {
        self.viewport.pan_by(delta);
        self.fire(MapEvent::Move);
    }

    /// Pans so that `center` ends up in the middle of the view.
    ///
    /// The view jumps to its final position; with `animate` set, hosts may
    /// tween toward it using [`Map::last_pan`].
    pub fn pan_to(&mut self, center: LatLng, options: PanOptions) {
        let target = self.viewport.lat_lng_to_container_point(&center);
        let middle = self.viewport.size.multiply(0.5);
        self.last_pan = Some(PanRequest { center, options });
        log::debug!("panning to {:?} (animate: {})", center, options.animate);
        self.pan_by(target.subtract(&middle));
    }

    pub fn last_pan(&self) -> Option<PanRequest> {
        self.last_pan
    }

    /// Opens the marker's popup, closing any other open popup first
    pub fn open_popup(&mut self, marker: &Marker) -> Result<()> {
        let popup = marker
            .popup()
            .cloned()
            .ok_or_else(|| MapError::Layer(format!("marker '{}' has no popup", marker.id())))?;

        let others: Vec<String> = self
            .open_popups
            .keys()
            .filter(|id| id.as_str() != marker.id())
            .cloned()
            .collect();
        for marker_id in others {
            self.close_popup(&marker_id);
        }

        self.open_popups.insert(
            marker.id().to_string(),
            OpenPopup {
                popup,
                anchor: marker.popup_anchor(),
            },
        );
        self.fire(MapEvent::PopupOpen {
            marker_id: marker.id().to_string(),
        });
        Ok(())
    }

    /// Closes the marker's popup. Returns false when none was open.
    pub fn close_popup(&mut self, marker_id: &str) -> bool {
        if self.open_popups.remove(marker_id).is_none() {
            return false;
        }
        self.fire(MapEvent::PopupClose {
            marker_id: marker_id.to_string(),
        });
        true
    }

    pub fn has_open_popup(&self, marker_id: &str) -> bool {
        self.open_popups.contains_key(marker_id)
    }

    /// Box of the marker's open popup when the marker projects to `marker_point`
    pub fn popup_box(&self, marker_id: &str, marker_point: Point) -> Option<Bounds> {
        self.open_popups
            .get(marker_id)
            .map(|open| open.popup.popup_box(marker_point, open.anchor))
    }

    /// Attaches a plugin under its own name and runs its `on_add` hook
    pub fn add_plugin(&mut self, mut plugin: Box<dyn PluginTrait>) -> Result<()> {
        let name = plugin.name().to_string();
        if self.plugins.contains_key(&name) {
            return Err(MapError::Plugin(format!("plugin '{}' already added", name)));
        }
        plugin.on_add(self)?;
        self.plugins.insert(name, plugin);
        Ok(())
    }

    /// Detaches a plugin, running its `on_remove` hook, and hands it back
    pub fn remove_plugin(&mut self, name: &str) -> Result<Option<Box<dyn PluginTrait>>> {
        match self.plugins.remove(name) {
            Some(mut plugin) => {
                plugin.on_remove(self)?;
                Ok(Some(plugin))
            }
            None => Ok(None),
        }
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Borrows a plugin as its concrete type
    pub fn plugin<T: 'static>(&self, name: &str) -> Option<&T> {
        self.plugins
            .get(name)
            .and_then(|plugin| plugin.as_any().downcast_ref::<T>())
    }

    /// Runs `f` with mutable access to a plugin and the map.
    ///
    /// The plugin is taken out of the map while `f` runs, so events fired from
    /// inside `f` do not reach it.
    pub fn update_plugin<T: 'static, R>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut T, &mut Map) -> Result<R>,
    ) -> Result<R> {
        let mut plugin = self
            .plugins
            .remove(name)
            .ok_or_else(|| MapError::Plugin(format!("plugin '{}' not found", name)))?;
        let result = match plugin.as_any_mut().downcast_mut::<T>() {
            Some(concrete) => f(concrete, self),
            None => Err(MapError::Plugin(format!(
                "plugin '{}' is not of the requested type",
                name
            ))),
        };
        self.plugins.insert(name.to_string(), plugin);
        result
    }

    /// Subscribes `listener` to the given event kinds
    pub fn on(&mut self, listener: &str, kinds: &[MapEventKind]) {
        for kind in kinds {
            let exists = self
                .listeners
                .iter()
                .any(|(name, existing)| name == listener && existing == kind);
            if !exists {
                self.listeners.push((listener.to_string(), *kind));
            }
        }
    }

    /// Unsubscribes `listener` from the given event kinds
    pub fn off(&mut self, listener: &str, kinds: &[MapEventKind]) {
        self.listeners
            .retain(|(name, kind)| !(name == listener && kinds.contains(kind)));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Simulates a click on an overlay element
    pub fn click_element(&mut self, element: ElementId) {
        self.fire(MapEvent::ElementClick { element });
    }

    /// Queues an event and, unless already dispatching, delivers the queue
    pub fn fire(&mut self, event: MapEvent) {
        self.pending_events.push_back(event);
        if self.dispatching {
            return;
        }

        self.dispatching = true;
        while let Some(event) = self.pending_events.pop_front() {
            self.dispatch(&event);
        }
        self.dispatching = false;
    }

    fn dispatch(&mut self, event: &MapEvent) {
        let targets: Vec<String> = match event {
            MapEvent::ElementClick { element } => self
                .overlay_pane
                .get(*element)
                .and_then(|e| e.click_listener.clone())
                .into_iter()
                .collect(),
            _ => {
                let kind = event.kind();
                self.listeners
                    .iter()
                    .filter(|(_, listening)| *listening == kind)
                    .map(|(name, _)| name.clone())
                    .collect()
            }
        };

        for name in targets {
            // Taken out while it runs so the handler can borrow the map mutably
            let Some(mut plugin) = self.plugins.remove(&name) else {
                continue;
            };
            if let Err(e) = plugin.handle_event(event, self) {
                log::error!("plugin '{}' failed to handle {}: {}", name, event.kind(), e);
            }
            self.plugins.insert(name, plugin);
        }
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::with_viewport(Viewport::default())
    }
}
