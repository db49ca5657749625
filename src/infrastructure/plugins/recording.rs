use crate::entities::CalendarEvent;
use crate::infrastructure::CalendarListener;
use anyhow::Result;
use std::sync::{Arc, Mutex};

/// Listener that keeps every notification in a shared list.
///
/// Clones share the same list, so a host can register one clone and keep
/// another to read from.
#[derive(Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<CalendarEvent>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<CalendarEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl CalendarListener for RecordingListener {
    fn on_event(&self, event: &CalendarEvent) -> Result<()> {
        self.events
            .lock()
            .map_err(|_| anyhow::anyhow!("event list lock poisoned"))?
            .push(event.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "Recording"
    }
}
