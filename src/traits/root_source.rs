use anyhow::Result;
use async_trait::async_trait;

use crate::types::Root;

/// Authority that advances the canonical root on the home ledger.
///
/// Whatever it returns is propagated as-is.
#[async_trait]
pub trait RootSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    async fn latest_root(&self) -> Result<Root>;
}
