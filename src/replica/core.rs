//! Replica host: authenticates incoming messages and applies them to the
//! local root history.

use tracing::info;
use tracing::warn;

use crate::authority::AdminRole;
use crate::codec::WireFormat;
use crate::error::AuthorityError;
use crate::error::ReplicaError;
use crate::error::RootError;
use crate::events::EventSinkVariant;
use crate::root_history::RootHistory;
use crate::storage::RootHistoryStore;
use crate::traits::EventSink;
use crate::types::Address;
use crate::types::Authority;
use crate::types::Delivery;
use crate::types::Event;
use crate::types::GasUnits;
use crate::types::Origin;
use crate::types::RemoteMessage;
use crate::types::Root;
use crate::types::RootRecord;
use crate::types::Timestamp;
use crate::types::DEFAULT_EXPIRY_WINDOW_SECS;

/// Remote execution cost of each message kind.
///
/// A delivery whose budget is below the cost of its message fails without
/// touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionCosts {
    pub receive_root: GasUnits,
    pub set_expiry_window: GasUnits,
    pub transfer_authority: GasUnits,
}

impl Default for ExecutionCosts {
    fn default() -> Self {
        Self {
            receive_root: 60_000,
            set_expiry_window: 25_000,
            transfer_authority: 45_000,
        }
    }
}

impl ExecutionCosts {
    pub fn required(&self, message: &RemoteMessage) -> GasUnits {
        match message {
            RemoteMessage::ReceiveRoot { .. } => self.receive_root,
            RemoteMessage::SetExpiryWindow { .. } => self.set_expiry_window,
            RemoteMessage::TransferAuthority { .. } => self.transfer_authority,
        }
    }
}

/// One remote replica.
pub struct Replica {
    address: Address,
    history: RootHistory,
    role: AdminRole,
    format: WireFormat,
    costs: ExecutionCosts,
    store: Option<RootHistoryStore>,
    events: EventSinkVariant,
}

impl Replica {
    /// Provision an in-memory replica with an empty history and the default
    /// expiry window.
    ///
    /// `messenger` is the bridge contract trusted to relay calls from a
    /// cross-domain authority.
    pub fn new(
        address: Address,
        authority: Authority,
        messenger: Address,
        format: WireFormat,
        events: EventSinkVariant,
    ) -> Result<Self, ReplicaError> {
        Ok(Self {
            address,
            history: RootHistory::new(DEFAULT_EXPIRY_WINDOW_SECS),
            role: AdminRole::new(authority, messenger)?,
            format,
            costs: ExecutionCosts::default(),
            store: None,
            events,
        })
    }

    /// Open a persistent replica, restoring any state already in `store`.
    ///
    /// `authority` and `expiry_window` only apply when the store holds none.
    pub fn open(
        address: Address,
        authority: Authority,
        messenger: Address,
        format: WireFormat,
        expiry_window: u64,
        store: RootHistoryStore,
        events: EventSinkVariant,
    ) -> Result<Self, ReplicaError> {
        let stored = store.load().map_err(ReplicaError::Storage)?;
        let authority = stored.authority.unwrap_or(authority);
        let window = stored.expiry_window.unwrap_or(expiry_window);
        let history = RootHistory::restore(stored.records, window)?;
        let role = AdminRole::new(authority, messenger)?;

        if stored.authority.is_none() {
            store
                .put_authority(&authority)
                .map_err(ReplicaError::Storage)?;
        }
        if stored.expiry_window.is_none() {
            store
                .put_expiry_window(window)
                .map_err(ReplicaError::Storage)?;
        }

        info!(
            "Replica {} opened: {} records, latest {}, window {}s, {} format via messenger {}",
            address,
            history.len(),
            history.latest_root(),
            window,
            format.name(),
            role.messenger()
        );

        Ok(Self {
            address,
            history,
            role,
            format,
            costs: ExecutionCosts::default(),
            store: Some(store),
            events,
        })
    }

    pub fn with_costs(mut self, costs: ExecutionCosts) -> Self {
        self.costs = costs;
        self
    }

    /// Entry point for messages relayed by the bridge.
    ///
    /// Rejects deliveries addressed elsewhere or not relayed on behalf of the
    /// administrative authority, then charges the budget, decodes, and
    /// applies the message.
    pub fn handle_delivery(&mut self, delivery: &Delivery) -> Result<(), ReplicaError> {
        if delivery.destination != self.address {
            return Err(ReplicaError::WrongDestination {
                expected: self.address,
                got: delivery.destination,
            });
        }
        let origin = Origin::Bridge {
            messenger: delivery.messenger,
            sender: delivery.sender,
        };
        self.role.ensure(&origin)?;

        let message = self.format.decode(&delivery.payload)?;
        let required = self.costs.required(&message);
        if delivery.budget < required {
            return Err(ReplicaError::OutOfBudget {
                required,
                supplied: delivery.budget,
            });
        }

        self.apply(&origin, message)
    }

    fn apply(&mut self, origin: &Origin, message: RemoteMessage) -> Result<(), ReplicaError> {
        match message {
            RemoteMessage::ReceiveRoot { root, observed_at } => {
                self.receive_root(origin, root, observed_at)
            }
            RemoteMessage::SetExpiryWindow { window } => self.set_expiry_window(origin, window),
            RemoteMessage::TransferAuthority { authority } => {
                self.transfer_authority(origin, authority)
            }
        }
    }

    /// Accept `root` as the new head, superseding the previous one at
    /// `observed_at`.
    pub fn receive_root(
        &mut self,
        origin: &Origin,
        root: Root,
        observed_at: Timestamp,
    ) -> Result<(), ReplicaError> {
        self.role.ensure(origin)?;
        self.history.check_accept(&root)?;

        let previous = self.history.head().copied();
        if let Some(store) = &self.store {
            let seq = self.history.len() as u64;
            let superseded = previous.map(|r| RootRecord {
                root: r.root,
                superseded_at: Some(observed_at),
            });
            let record = RootRecord {
                root,
                superseded_at: None,
            };
            store
                .persist_accept(
                    superseded.as_ref().map(|r| (seq - 1, r)),
                    seq,
                    &record,
                )
                .map_err(ReplicaError::Storage)?;
        }

        self.history.accept_root(root, observed_at)?;

        let window = self.history.expiry_window();
        let superseded = previous.map(|r| (r.root, observed_at.saturating_add(window)));
        info!(
            "Replica {} accepted root {} (supersedes {:?})",
            self.address,
            root,
            superseded.map(|(r, _)| r)
        );
        self.events.emit(Event::RootAccepted {
            replica: self.address,
            root,
            observed_at,
            superseded,
        });
        Ok(())
    }

    pub fn set_expiry_window(&mut self, origin: &Origin, window: u64) -> Result<(), ReplicaError> {
        self.role.ensure(origin)?;
        if let Some(store) = &self.store {
            store
                .put_expiry_window(window)
                .map_err(ReplicaError::Storage)?;
        }
        let previous = self.history.set_expiry_window(window);
        info!(
            "Replica {} expiry window {}s -> {}s",
            self.address, previous, window
        );
        self.events.emit(Event::ExpiryWindowChanged {
            replica: self.address,
            previous,
            current: window,
        });
        Ok(())
    }

    pub fn transfer_authority(
        &mut self,
        origin: &Origin,
        authority: Authority,
    ) -> Result<(), ReplicaError> {
        self.role.ensure(origin)?;
        if authority.address().is_zero() {
            return Err(AuthorityError::ZeroAddress.into());
        }
        if let Some(store) = &self.store {
            store
                .put_authority(&authority)
                .map_err(ReplicaError::Storage)?;
        }
        let previous = self.role.transfer(authority)?;
        info!(
            "Replica {} authority {:?} -> {:?}",
            self.address, previous, authority
        );
        self.events.emit(Event::AuthorityChanged {
            replica: self.address,
            previous,
            current: authority,
        });
        Ok(())
    }

    /// Always fails: a replica must keep an authority able to reconfigure it.
    pub fn renounce_authority(&self, origin: &Origin) -> Result<(), ReplicaError> {
        self.role.ensure(origin)?;
        warn!("Replica {} refused to renounce authority", self.address);
        self.role.renounce()?;
        Ok(())
    }

    /// Whether `root` is an acceptable verification target at `now`.
    pub fn is_valid_root(&self, root: &Root, now: Timestamp) -> Result<(), RootError> {
        self.history.is_valid_root(root, now)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn authority(&self) -> Authority {
        self.role.holder()
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    pub fn history(&self) -> &RootHistory {
        &self.history
    }

    pub fn latest_root(&self) -> Root {
        self.history.latest_root()
    }

    pub fn expiry_window(&self) -> u64 {
        self.history.expiry_window()
    }
}
