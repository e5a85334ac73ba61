use async_trait::async_trait;

use super::in_process::InProcessTransport;
use super::mock::MockTransport;
use crate::error::TransportError;
use crate::traits::Transport;
use crate::types::Address;
use crate::types::GasUnits;

/// Enum representing all possible transport implementations.
pub enum TransportVariant {
    InProcess(InProcessTransport),
    Mock(MockTransport),
}

#[async_trait]
impl Transport for TransportVariant {
    fn name(&self) -> &'static str {
        match self {
            TransportVariant::InProcess(inner) => inner.name(),
            TransportVariant::Mock(inner) => inner.name(),
        }
    }

    async fn submit(
        &self,
        destination: Address,
        budget: GasUnits,
        payload: Vec<u8>,
    ) -> Result<(), TransportError> {
        match self {
            TransportVariant::InProcess(inner) => inner.submit(destination, budget, payload).await,
            TransportVariant::Mock(inner) => inner.submit(destination, budget, payload).await,
        }
    }
}
