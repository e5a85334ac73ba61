use anyhow::Result;
use async_trait::async_trait;

use super::file::FileRootSource;
use super::memory::InMemoryRootSource;
use crate::traits::RootSource;
use crate::types::Root;

/// Enum representing all possible root source implementations.
pub enum RootSourceVariant {
    Memory(InMemoryRootSource),
    File(FileRootSource),
}

#[async_trait]
impl RootSource for RootSourceVariant {
    fn name(&self) -> &'static str {
        match self {
            RootSourceVariant::Memory(inner) => inner.name(),
            RootSourceVariant::File(inner) => inner.name(),
        }
    }

    async fn latest_root(&self) -> Result<Root> {
        match self {
            RootSourceVariant::Memory(inner) => inner.latest_root().await,
            RootSourceVariant::File(inner) => inner.latest_root().await,
        }
    }
}
