use crate::{core::map::Map, input::events::MapEvent, Result};
use std::any::Any;

/// A component attached to a [`Map`] for the duration of its lifecycle
pub trait PluginTrait: Send + Sync {
    /// Unique name; the map keys plugins and event listeners by it
    fn name(&self) -> &str;

    fn on_add(&mut self, _map: &mut Map) -> Result<()> {
        Ok(())
    }

    fn on_remove(&mut self, _map: &mut Map) -> Result<()> {
        Ok(())
    }

    /// Called for every event the plugin subscribed to with [`Map::on`]
    fn handle_event(&mut self, _event: &MapEvent, _map: &mut Map) -> Result<()> {
        Ok(())
    }

    /// Dynamic casting support
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
