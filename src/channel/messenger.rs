use async_trait::async_trait;

use crate::codec::WireFormat;
use crate::error::ChannelError;
use crate::traits::Channel;
use crate::traits::Transport;
use crate::transport::TransportVariant;
use crate::types::Address;
use crate::types::GasUnits;
use crate::types::RemoteMessage;

/// Channel to a replica behind a cross-domain messenger.
///
/// Messages are encoded as entry-point calls and the budget is forwarded as
/// the remote execution limit.
pub struct MessengerChannel {
    name: String,
    destination: Address,
    home_messenger: Address,
    transport: TransportVariant,
}

impl MessengerChannel {
    pub fn new(
        name: impl Into<String>,
        destination: Address,
        home_messenger: Address,
        transport: TransportVariant,
    ) -> Self {
        Self {
            name: name.into(),
            destination,
            home_messenger,
            transport,
        }
    }

    pub fn format(&self) -> WireFormat {
        WireFormat::Call
    }
}

#[async_trait]
impl Channel for MessengerChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn destination(&self) -> Address {
        self.destination
    }

    async fn send(&self, message: &RemoteMessage, budget: GasUnits) -> Result<(), ChannelError> {
        let payload = self.format().encode(message)?;
        tracing::debug!(
            "Messenger {} via {}: {:?} ({} bytes, budget {})",
            self.name,
            self.home_messenger,
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
