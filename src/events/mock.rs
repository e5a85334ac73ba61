use std::sync::Arc;
use std::sync::Mutex;

use crate::traits::EventSink;
use crate::types::Event;

/// Mock sink for testing. Keeps every event in memory.
#[derive(Clone, Default)]
pub struct MockSink {
    pub events: Arc<Mutex<Vec<Event>>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all emitted events (for testing/verification).
    pub fn get_events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl EventSink for MockSink {
    fn name(&self) -> &'static str {
        "mock-sink"
    }

    fn emit(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}
