pub mod messenger;
pub mod tunnel;
pub mod variant;

pub use messenger::MessengerChannel;
pub use tunnel::TunnelChannel;
pub use variant::ChannelVariant;
