use crate::entities::CalendarEvent;
use anyhow::Result;

/// Trait for plugins that respond to calendar notifications
pub trait CalendarListener: Send + Sync {
    /// Called after the calendar state changed and the view was re-rendered
    fn on_event(&self, event: &CalendarEvent) -> Result<()>;

    /// Human-readable name for this listener
    fn name(&self) -> &str;
}

/// Registry for managing calendar listeners
pub struct ListenerRegistry {
    listeners: Vec<Box<dyn CalendarListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a new listener
    pub fn register<L>(&mut self, listener: L)
    where
        L: CalendarListener + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver an event to every registered listener
    pub fn dispatch(&self, event: &CalendarEvent) {
        log::debug!("dispatching {} to {} listener(s)", event.name(), self.listeners.len());
        for listener in &self.listeners {
            if let Err(e) = listener.on_event(event) {
                // Continue with other listeners even if one fails
                log::warn!("Listener '{}' failed on {}: {:#}", listener.name(), event.name(), e);
            }
        }
    }

    /// List all registered listeners
    pub fn list_listeners(&self) -> Vec<&str> {
        self.listeners.iter().map(|l| l.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
