use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::Address;
use crate::types::GasUnits;

/// Point-to-point messaging between the home ledger and one remote ledger.
///
/// Implementations deliver each accepted payload at least once and in
/// submission order. Delivery may be arbitrarily delayed.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logging.
    fn name(&self) -> &'static str;

    async fn submit(
        &self,
        destination: Address,
        budget: GasUnits,
        payload: Vec<u8>,
    ) -> Result<(), TransportError>;
}
