use super::channel::ChannelSink;
use super::log::LogSink;
use super::mock::MockSink;
use crate::traits::EventSink;
use crate::types::Event;

/// Enum representing all possible event sink implementations.
pub enum EventSinkVariant {
    Log(LogSink),
    Channel(ChannelSink),
    Mock(MockSink),
}

impl Default for EventSinkVariant {
    fn default() -> Self {
        EventSinkVariant::Log(LogSink)
    }
}

impl EventSink for EventSinkVariant {
    fn name(&self) -> &'static str {
        match self {
            EventSinkVariant::Log(inner) => inner.name(),
            EventSinkVariant::Channel(inner) => inner.name(),
            EventSinkVariant::Mock(inner) => inner.name(),
        }
    }

    fn emit(&self, event: Event) {
        match self {
            EventSinkVariant::Log(inner) => inner.emit(event),
            EventSinkVariant::Channel(inner) => inner.emit(event),
            EventSinkVariant::Mock(inner) => inner.emit(event),
        }
    }
}
