use async_trait::async_trait;

use crate::error::ChannelError;
use crate::types::Address;
use crate::types::GasUnits;
use crate::types::RemoteMessage;

/// One remote destination and the protocol used to reach it.
///
/// Each remote protocol family provides its own implementation, which owns
/// the payload encoding and the transport. The dispatcher only sees this
/// trait.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name for logging and events.
    fn name(&self) -> &str;

    /// Address of the remote replica this channel delivers to.
    fn destination(&self) -> Address;

    /// Encode `message` and submit it with `budget`.
    ///
    /// Success means the transport took the message for eventual delivery,
    /// not that the replica applied it.
    async fn send(&self, message: &RemoteMessage, budget: GasUnits) -> Result<(), ChannelError>;
}
