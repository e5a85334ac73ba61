//! Local relay: one dispatcher and its replicas wired in a single process.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use kanal::AsyncReceiver;
use tokio::sync::Mutex;
use tracing::error;
use tracing::info;

use crate::channel::ChannelVariant;
use crate::channel::MessengerChannel;
use crate::channel::TunnelChannel;
use crate::codec::WireFormat;
use crate::config::BaseConfig;
use crate::dispatcher::ChannelConfig;
use crate::dispatcher::PropagationDispatcher;
use crate::events::EventSinkVariant;
use crate::events::LogSink;
use crate::replica::Replica;
use crate::root_source::FileRootSource;
use crate::root_source::RootSourceVariant;
use crate::storage::RootHistoryStore;
use crate::transport::InProcessTransport;
use crate::transport::TransportVariant;
use crate::types::Address;
use crate::types::Authority;
use crate::types::Delivery;

/// Home-ledger address the dispatcher submits from.
pub const DISPATCHER_ADDRESS: u64 = 0x1000;
const MESSENGER_BASE: u64 = 0x2000;
const REPLICA_BASE: u64 = 0x3000;
const HOME_MESSENGER_BASE: u64 = 0x4000;

/// A replica and the receiving end of its channel's transport.
pub struct ReplicaNode {
    pub replica: Replica,
    pub inbox: AsyncReceiver<Delivery>,
}

pub struct RelayApp {
    pub config: BaseConfig,
    pub dispatcher: PropagationDispatcher<RootSourceVariant>,
    pub nodes: Vec<ReplicaNode>,
}

impl RelayApp {
    /// Wire a dispatcher reading the root file to `config.replicas`
    /// persistent replicas. Even-numbered replicas sit behind a messenger,
    /// odd-numbered ones behind a tunnel.
    pub fn initialize(config: BaseConfig) -> Result<Self> {
        let dispatcher_address = Address::from_low_u64(DISPATCHER_ADDRESS);
        let mut channels = Vec::with_capacity(config.replicas);
        let mut nodes = Vec::with_capacity(config.replicas);

        for i in 0..config.replicas as u64 {
            let destination = Address::from_low_u64(REPLICA_BASE + i);
            let messenger = Address::from_low_u64(MESSENGER_BASE + i);
            let home_messenger = Address::from_low_u64(HOME_MESSENGER_BASE + i);
            let (transport, inbox) = InProcessTransport::new(messenger, dispatcher_address);
            let transport = TransportVariant::InProcess(transport);

            let (channel, format) = if i % 2 == 0 {
                let name = format!("messenger-{}", i);
                let channel = MessengerChannel::new(name, destination, home_messenger, transport);
                (ChannelVariant::Messenger(channel), WireFormat::Call)
            } else {
                let name = format!("tunnel-{}", i);
                let channel = TunnelChannel::new(name, destination, home_messenger, transport);
                (ChannelVariant::Tunnel(channel), WireFormat::Tunnel)
            };
            channels.push(ChannelConfig::new(channel).with_budgets(config.budgets()));

            let path = Path::new(&config.storage_path).join(format!("replica-{}", i));
            let path = path
                .to_str()
                .context("storage path is not valid UTF-8")?
                .to_string();
            let store = RootHistoryStore::open(&path)
                .with_context(|| format!("opening replica store at {}", path))?;
            let replica = Replica::open(
                destination,
                Authority::CrossDomain(dispatcher_address),
                messenger,
                format,
                config.expiry_window_secs,
                store,
                EventSinkVariant::Log(LogSink),
            )?;
            nodes.push(ReplicaNode { replica, inbox });
        }

        let source = RootSourceVariant::File(FileRootSource::new(&config.root_file));
        let dispatcher = PropagationDispatcher::new(
            config.admin,
            source,
            channels,
            EventSinkVariant::Log(LogSink),
        )?;

        Ok(Self {
            config,
            dispatcher,
            nodes,
        })
    }

    /// Spawn one delivery pump per replica and the propagation loop, then
    /// wait for Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let RelayApp {
            config,
            dispatcher,
            nodes,
        } = self;

        info!(
            "Starting relay: {} replicas, interval {}s, root file {}",
            nodes.len(),
            config.propagate_interval_secs,
            config.root_file
        );

        let mut pumps = Vec::with_capacity(nodes.len());
        for node in nodes {
            let replica = Arc::new(Mutex::new(node.replica));
            pumps.push(tokio::spawn(Replica::run_delivery_pump(replica, node.inbox)));
        }

        let dispatcher = Arc::new(Mutex::new(dispatcher));
        let interval = Duration::from_secs(config.propagate_interval_secs.max(1));
        let propagation =
            tokio::spawn(PropagationDispatcher::run_propagation_loop(dispatcher, interval));

        tokio::signal::ctrl_c().await?;
        info!("Shutdown requested");

        // Dropping the dispatcher closes every transport, which ends the pumps.
        propagation.abort();
        let _ = propagation.await;
        for pump in pumps {
            match pump.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Delivery pump failed: {:#}", e),
                Err(e) => error!("Delivery pump panicked: {}", e),
            }
        }
        Ok(())
    }
}
