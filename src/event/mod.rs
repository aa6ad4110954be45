mod bus;
mod events;

pub use bus::EventBus;
pub use events::SurfaceEvent;

/// Receives change notifications from the surface
pub trait EventHandler {
    fn handle_event(&mut self, event: &SurfaceEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&SurfaceEvent),
{
    fn handle_event(&mut self, event: &SurfaceEvent) {
        self(event)
    }
}
