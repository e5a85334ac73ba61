pub mod channel;
pub mod log;
pub mod mock;
pub mod variant;

pub use channel::ChannelSink;
pub use log::LogSink;
pub use mock::MockSink;
pub use variant::EventSinkVariant;
