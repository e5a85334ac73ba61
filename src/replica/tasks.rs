//! Delivery pump: the replica side of a transport.

use std::sync::Arc;

use kanal::AsyncReceiver;
use tokio::sync::Mutex;
use tracing::debug;
use tracing::info;
use tracing::span;
use tracing::warn;
use tracing::Instrument;
use tracing::Level;

use super::core::Replica;
use crate::error::ReplicaError;
use crate::error::RootError;
use crate::types::Delivery;

impl Replica {
    /// Apply one delivery, logging the outcome.
    ///
    /// Returns `true` when the delivery changed state. Duplicate roots are
    /// expected under at-least-once delivery and are not treated as faults.
    pub async fn deliver_once(replica: &Mutex<Replica>, delivery: &Delivery) -> bool {
        let mut replica = replica.lock().await;
        match replica.handle_delivery(delivery) {
            Ok(()) => true,
            Err(ReplicaError::Root(RootError::DuplicateRoot(root))) => {
                debug!("Replica {} ignored redelivered root {}", replica.address(), root);
                false
            }
            Err(e) => {
                warn!(
                    "Replica {} rejected delivery from {}: {}",
                    replica.address(),
                    delivery.sender,
                    e
                );
                false
            }
        }
    }

    /// Drain `rx` until the transport side is dropped.
    pub async fn run_delivery_pump(
        replica: Arc<Mutex<Replica>>,
        rx: AsyncReceiver<Delivery>,
    ) -> anyhow::Result<()> {
        let address = replica.lock().await.address();
        let span = span!(Level::INFO, "delivery_pump", replica = %address);
        async move {
            info!("Delivery pump started");
            let mut applied = 0u64;
            while let Ok(delivery) = rx.recv().await {
                if Replica::deliver_once(&replica, &delivery).await {
                    applied += 1;
                }
            }
            info!("Delivery pump finished (channel closed, {} applied)", applied);
            Ok(())
        }
        .instrument(span)
        .await
    }
}
