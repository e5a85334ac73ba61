use crate::traits::EventSink;
use crate::types::Event;

/// Writes every event to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    fn emit(&self, event: Event) {
        match serde_json::to_string(&event) {
            Ok(json) => tracing::info!(target: "rootrelay::events", "{}", json),
            Err(e) => tracing::warn!("Failed to serialize event {:?}: {}", event, e),
        }
    }
}
