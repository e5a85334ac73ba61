use std::sync::Arc;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::traits::RootSource;
use crate::types::Root;

/// Canonical root held in memory, shared between the authority that
/// advances it and the dispatcher that reads it.
#[derive(Clone, Default)]
pub struct InMemoryRootSource {
    root: Arc<RwLock<Root>>,
}

impl InMemoryRootSource {
    pub fn new(root: Root) -> Self {
        Self {
            root: Arc::new(RwLock::new(root)),
        }
    }

    /// Advance the canonical root.
    pub fn set(&self, root: Root) {
        *self.root.write().unwrap_or_else(|e| e.into_inner()) = root;
    }
}

#[async_trait]
impl RootSource for InMemoryRootSource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn latest_root(&self) -> Result<Root> {
        Ok(*self.root.read().unwrap_or_else(|e| e.into_inner()))
    }
}
