pub mod channel;
pub mod event_sink;
pub mod root_source;
pub mod transport;

pub use channel::Channel;
pub use event_sink::EventSink;
pub use root_source::RootSource;
pub use transport::Transport;
