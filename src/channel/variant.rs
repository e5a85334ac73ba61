use async_trait::async_trait;

use super::messenger::MessengerChannel;
use super::tunnel::TunnelChannel;
use crate::codec::WireFormat;
use crate::error::ChannelError;
use crate::traits::Channel;
use crate::types::Address;
use crate::types::GasUnits;
use crate::types::RemoteMessage;

/// Enum representing all possible channel implementations.
pub enum ChannelVariant {
    Messenger(MessengerChannel),
    Tunnel(TunnelChannel),
}

impl ChannelVariant {
    /// Wire format the replica behind this channel must decode.
    pub fn format(&self) -> WireFormat {
        match self {
            ChannelVariant::Messenger(inner) => inner.format(),
            ChannelVariant::Tunnel(inner) => inner.format(),
        }
    }
}

#[async_trait]
impl Channel for ChannelVariant {
    fn name(&self) -> &str {
        match self {
            ChannelVariant::Messenger(inner) => inner.name(),
            ChannelVariant::Tunnel(inner) => inner.name(),
        }
    }

    fn destination(&self) -> Address {
        match self {
            ChannelVariant::Messenger(inner) => inner.destination(),
            ChannelVariant::Tunnel(inner) => inner.destination(),
        }
    }

    async fn send(&self, message: &RemoteMessage, budget: GasUnits) -> Result<(), ChannelError> {
        match self {
            ChannelVariant::Messenger(inner) => inner.send(message, budget).await,
            ChannelVariant::Tunnel(inner) => inner.send(message, budget).await,
        }
    }
}
