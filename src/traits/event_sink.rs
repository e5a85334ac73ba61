use crate::types::Event;

/// Receiver of observable notifications.
pub trait EventSink: Send + Sync {
    /// Sink name for logging.
    fn name(&self) -> &'static str;

    /// Publish one event. Sinks never fail the operation that emitted it.
    fn emit(&self, event: Event);
}
