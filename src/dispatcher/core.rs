//! PropagationDispatcher: fans the canonical root and administrative
//! messages out to every registered channel.

use tracing::error;
use tracing::info;
use tracing::warn;

use crate::authority::AdminRole;
use crate::channel::ChannelVariant;
use crate::error::AuthorityError;
use crate::error::ChannelError;
use crate::error::DispatchError;
use crate::events::EventSinkVariant;
use crate::traits::Channel;
use crate::traits::EventSink;
use crate::traits::RootSource;
use crate::types::Address;
use crate::types::Authority;
use crate::types::BudgetKind;
use crate::types::Budgets;
use crate::types::Event;
use crate::types::GasUnits;
use crate::types::Origin;
use crate::types::RemoteMessage;
use crate::types::Timestamp;

/// A registered destination with its per-kind execution budgets.
pub struct ChannelConfig {
    pub channel: ChannelVariant,
    pub budgets: Budgets,
}

impl ChannelConfig {
    pub fn new(channel: ChannelVariant) -> Self {
        Self {
            channel,
            budgets: Budgets::default(),
        }
    }

    pub fn with_budgets(mut self, budgets: Budgets) -> Self {
        self.budgets = budgets;
        self
    }
}

/// Result of submitting one message on one channel.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel: String,
    pub destination: Address,
    pub result: Result<(), ChannelError>,
}

/// Per-channel outcomes of one fan-out.
///
/// Partial success is a normal outcome: a failed channel neither blocks nor
/// rolls back the others.
#[derive(Debug)]
pub struct DispatchReport {
    pub message: RemoteMessage,
    pub outcomes: Vec<ChannelOutcome>,
}

impl DispatchReport {
    pub fn submitted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> Vec<&ChannelOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err()).collect()
    }

    /// Whether every channel accepted the message.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Home-side orchestrator.
///
/// Destinations are fixed at construction; only their budgets change.
pub struct PropagationDispatcher<S: RootSource> {
    root_source: S,
    channels: Vec<ChannelConfig>,
    role: AdminRole,
    events: EventSinkVariant,
}

impl<S: RootSource> PropagationDispatcher<S> {
    pub fn new(
        admin: Address,
        root_source: S,
        channels: Vec<ChannelConfig>,
        events: EventSinkVariant,
    ) -> Result<Self, DispatchError> {
        // The home role is always held by a local account, so no messenger
        // is trusted.
        let role = AdminRole::new(Authority::Local(admin), Address::ZERO)?;
        Ok(Self {
            root_source,
            channels,
            role,
            events,
        })
    }

    fn ensure_admin(&self, caller: Address) -> Result<(), DispatchError> {
        self.role.ensure(&Origin::Direct(caller))?;
        Ok(())
    }

    /// Submit `message` on every channel with the budget of `kind`.
    async fn fan_out<F>(&self, message: RemoteMessage, on_success: F) -> DispatchReport
    where
        F: Fn(&ChannelConfig) -> Event,
    {
        let kind = message.budget_kind();
        let mut outcomes = Vec::with_capacity(self.channels.len());

        for config in &self.channels {
            let channel = &config.channel;
            let result = channel.send(&message, config.budgets.get(kind)).await;
            match &result {
                Ok(()) => self.events.emit(on_success(config)),
                Err(e) => error!(
                    "Channel {} -> {} failed for {:?}: {}",
                    channel.name(),
                    channel.destination(),
                    kind,
                    e
                ),
            }
            outcomes.push(ChannelOutcome {
                channel: channel.name().to_string(),
                destination: channel.destination(),
                result,
            });
        }

        let report = DispatchReport { message, outcomes };
        if report.is_complete() {
            info!(
                "{:?} submitted on all {} channels",
                kind,
                report.outcomes.len()
            );
        } else {
            warn!(
                "{:?} submitted on {}/{} channels",
                kind,
                report.submitted(),
                report.outcomes.len()
            );
        }
        report
    }

    /// Read the canonical root and submit it on every channel, stamped with
    /// the current time.
    pub async fn propagate_root(&self) -> Result<DispatchReport, DispatchError> {
        self.propagate_root_at(super::tasks::now_secs()).await
    }

    /// Same as `propagate_root` with an explicit observation time.
    pub async fn propagate_root_at(
        &self,
        observed_at: Timestamp,
    ) -> Result<DispatchReport, DispatchError> {
        let root = self
            .root_source
            .latest_root()
            .await
            .map_err(DispatchError::RootSource)?;
        info!(
            "Propagating root {} from {} to {} channels",
            root,
            self.root_source.name(),
            self.channels.len()
        );

        let message = RemoteMessage::ReceiveRoot { root, observed_at };
        Ok(self
            .fan_out(message, |config| Event::RootPropagated {
                channel: config.channel.name().to_string(),
                destination: config.channel.destination(),
                root,
                observed_at,
            })
            .await)
    }

    /// Ask every replica to hand its administrative role to `authority`.
    pub async fn transfer_administrative_authority(
        &self,
        caller: Address,
        authority: Authority,
    ) -> Result<DispatchReport, DispatchError> {
        self.ensure_admin(caller)?;
        if authority.address().is_zero() {
            return Err(AuthorityError::ZeroAddress.into());
        }

        let message = RemoteMessage::TransferAuthority { authority };
        Ok(self
            .fan_out(message, |config| Event::AuthorityTransferSent {
                channel: config.channel.name().to_string(),
                destination: config.channel.destination(),
                authority,
            })
            .await)
    }

    /// Ask every replica to use `window` as its expiry window.
    pub async fn set_remote_expiry_window(
        &self,
        caller: Address,
        window: u64,
    ) -> Result<DispatchReport, DispatchError> {
        self.ensure_admin(caller)?;

        let message = RemoteMessage::SetExpiryWindow { window };
        Ok(self
            .fan_out(message, |config| Event::RemoteExpiryWindowSent {
                channel: config.channel.name().to_string(),
                destination: config.channel.destination(),
                window,
            })
            .await)
    }

    /// Set the `kind` budget on every channel.
    pub fn set_execution_budget(
        &mut self,
        caller: Address,
        kind: BudgetKind,
        value: GasUnits,
    ) -> Result<(), DispatchError> {
        self.ensure_admin(caller)?;
        if value == 0 {
            return Err(DispatchError::ZeroBudget(kind));
        }
        for index in 0..self.channels.len() {
            self.apply_budget(index, kind, value);
        }
        Ok(())
    }

    /// Set the `kind` budget on the channel at `index` only.
    pub fn set_channel_execution_budget(
        &mut self,
        caller: Address,
        index: usize,
        kind: BudgetKind,
        value: GasUnits,
    ) -> Result<(), DispatchError> {
        self.ensure_admin(caller)?;
        if value == 0 {
            return Err(DispatchError::ZeroBudget(kind));
        }
        if index >= self.channels.len() {
            return Err(DispatchError::UnknownChannel(index));
        }
        self.apply_budget(index, kind, value);
        Ok(())
    }

    fn apply_budget(&mut self, index: usize, kind: BudgetKind, value: GasUnits) {
        let config = &mut self.channels[index];
        config.budgets.set(kind, value);
        info!(
            "Channel {} {} budget set to {}",
            config.channel.name(),
            kind,
            value
        );
        let event = Event::ExecutionBudgetChanged {
            channel: config.channel.name().to_string(),
            kind,
            value,
        };
        self.events.emit(event);
    }

    /// Hand the dispatcher's own administrative role to `successor`.
    pub fn transfer_home_authority(
        &mut self,
        caller: Address,
        successor: Address,
    ) -> Result<(), DispatchError> {
        self.ensure_admin(caller)?;
        let previous = self.role.transfer(Authority::Local(successor))?;
        info!(
            "Dispatcher authority {} -> {}",
            previous.address(),
            successor
        );
        self.events.emit(Event::HomeAuthorityChanged {
            previous: previous.address(),
            current: successor,
        });
        Ok(())
    }

    /// Always fails: without an authority, remote windows and budgets could
    /// never be changed again.
    pub fn renounce_authority(&self, caller: Address) -> Result<(), DispatchError> {
        self.ensure_admin(caller)?;
        self.role.renounce()?;
        Ok(())
    }

    pub fn admin(&self) -> Address {
        self.role.holder().address()
    }

    pub fn channels(&self) -> &[ChannelConfig] {
        &self.channels
    }

    pub fn budgets(&self, index: usize) -> Option<Budgets> {
        self.channels.get(index).map(|c| c.budgets)
    }

    pub fn root_source(&self) -> &S {
        &self.root_source
    }
}
