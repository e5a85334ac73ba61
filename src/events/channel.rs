use kanal::Sender;

use crate::traits::EventSink;
use crate::types::Event;

/// Publishes events to a kanal channel.
pub struct ChannelSink {
    sender: Sender<Event>,
}

impl ChannelSink {
    pub fn new(sender: Sender<Event>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelSink {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn emit(&self, event: Event) {
        if let Err(e) = self.sender.send(event) {
            tracing::warn!("Dropping event, channel closed: {}", e);
        }
    }
}
