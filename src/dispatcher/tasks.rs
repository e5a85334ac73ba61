//! Propagation loop with tokio - calls business logic from core.rs

use std::sync::Arc;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use tokio::sync::Mutex;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::span;
use tracing::warn;
use tracing::Instrument;
use tracing::Level;

use super::core::PropagationDispatcher;
use crate::traits::RootSource;
use crate::types::RemoteMessage;
use crate::types::Root;

/// Current unix time in seconds.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl<S: RootSource> PropagationDispatcher<S> {
    /// One propagation step.
    ///
    /// Skips the fan-out when the canonical root equals `last_complete`, the
    /// last root every channel accepted. After a partial failure the root is
    /// sent again on the next step; replicas that already hold it reject the
    /// copy as a duplicate.
    ///
    /// Returns the root that is now fully propagated, if any.
    pub async fn propagate_once(
        dispatcher: &Mutex<Self>,
        last_complete: Option<Root>,
    ) -> anyhow::Result<Option<Root>> {
        let dispatcher = dispatcher.lock().await;
        let current = dispatcher.root_source().latest_root().await?;
        if Some(current) == last_complete {
            debug!("Root {} already propagated", current);
            return Ok(last_complete);
        }

        let report = dispatcher.propagate_root().await?;
        // The source may have advanced since the check above.
        let sent = match report.message {
            RemoteMessage::ReceiveRoot { root, .. } => root,
            _ => current,
        };
        if report.is_complete() {
            return Ok(Some(sent));
        }
        warn!(
            "Root {} reached {}/{} channels, retrying next tick",
            sent,
            report.submitted(),
            report.outcomes.len()
        );
        Ok(last_complete)
    }

    /// Run the propagation loop until the task is dropped.
    pub async fn run_propagation_loop(
        dispatcher: Arc<Mutex<Self>>,
        interval: Duration,
    ) -> anyhow::Result<()> {
        let span = span!(Level::INFO, "propagation_task");
        async move {
            info!("Propagation task started (interval={:?})", interval);

            let mut last_complete: Option<Root> = None;
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match Self::propagate_once(&dispatcher, last_complete).await {
                    Ok(root) => last_complete = root,
                    Err(e) => error!("Propagation step failed: {:#}", e),
                }
            }
            #[allow(unreachable_code)]
            Ok::<(), anyhow::Error>(())
        }
        .instrument(span)
        .await
    }
}
