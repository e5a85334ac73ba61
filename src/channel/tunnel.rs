use async_trait::async_trait;

use crate::codec::WireFormat;
use crate::error::ChannelError;
use crate::traits::Channel;
use crate::traits::Transport;
use crate::transport::TransportVariant;
use crate::types::Address;
use crate::types::GasUnits;
use crate::types::RemoteMessage;

/// Channel to a replica behind a state tunnel.
///
/// Messages travel as versioned JSON envelopes.
pub struct TunnelChannel {
    name: String,
    destination: Address,
    home_tunnel: Address,
    transport: TransportVariant,
}

impl TunnelChannel {
    pub fn new(
        name: impl Into<String>,
        destination: Address,
        home_tunnel: Address,
        transport: TransportVariant,
    ) -> Self {
        Self {
            name: name.into(),
            destination,
            home_tunnel,
            transport,
        }
    }

    pub fn format(&self) -> WireFormat {
        WireFormat::Tunnel
    }
}

#[async_trait]
impl Channel for TunnelChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn destination(&self) -> Address {
        self.destination
    }

    async fn send(&self, message: &RemoteMessage, budget: GasUnits) -> Result<(), ChannelError> {
        let payload = self.format().encode(message)?;
        tracing::debug!(
            "Tunnel {} via {}: {:?} ({} bytes, budget {})",
            self.name,
            self.home_tunnel,
            message.budget_kind(),
            payload.len(),
            budget
        );
        self.transport
            .submit(self.destination, budget, payload)
            .await?;
        Ok(())
    }
}
