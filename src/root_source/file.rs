use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;

use crate::traits::RootSource;
use crate::types::Root;

/// Reads the canonical root as hex text from a file that the identity
/// authority rewrites whenever it advances the root.
pub struct FileRootSource {
    path: PathBuf,
}

impl FileRootSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RootSource for FileRootSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn latest_root(&self) -> Result<Root> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading root from {}", self.path.display()))?;
        let root = text
            .parse::<Root>()
            .with_context(|| format!("parsing root in {}", self.path.display()))?;
        Ok(root)
    }
}
