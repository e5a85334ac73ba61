use async_trait::async_trait;
use kanal::AsyncReceiver;
use kanal::AsyncSender;

use crate::error::TransportError;
use crate::traits::Transport;
use crate::types::Address;
use crate::types::Delivery;
use crate::types::GasUnits;

/// Transport backed by an unbounded kanal queue.
///
/// Stands in for a bridge when home and replicas run in one process. The
/// queue is FIFO, so per-channel ordering holds by construction.
pub struct InProcessTransport {
    messenger: Address,
    sender: Address,
    tx: AsyncSender<Delivery>,
}

impl InProcessTransport {
    /// Create a transport relayed by `messenger` on behalf of `sender`, along
    /// with the receiving end the remote side pumps from.
    pub fn new(messenger: Address, sender: Address) -> (Self, AsyncReceiver<Delivery>) {
        let (tx, rx) = kanal::unbounded_async::<Delivery>();
        (
            Self {
                messenger,
                sender,
                tx,
            },
            rx,
        )
    }
}

#[async_trait]
impl Transport for InProcessTransport {
    fn name(&self) -> &'static str {
        "in-process"
    }

    async fn submit(
        &self,
        destination: Address,
        budget: GasUnits,
        payload: Vec<u8>,
    ) -> Result<(), TransportError> {
        let delivery = Delivery {
            messenger: self.messenger,
            sender: self.sender,
            destination,
            budget,
            payload,
        };
        self.tx
            .send(delivery)
            .await
            .map_err(|_| TransportError::Closed { destination })?;
        tracing::trace!("Queued delivery to {} (budget {})", destination, budget);
        Ok(())
    }
}
