//! Unit tests for dispatcher fan-out and administration.

use anyhow::Result;
use tokio::sync::Mutex;

use super::core::ChannelConfig;
use super::core::PropagationDispatcher;
use crate::channel::ChannelVariant;
use crate::channel::MessengerChannel;
use crate::channel::TunnelChannel;
use crate::codec::WireFormat;
use crate::error::AuthorityError;
use crate::error::ChannelError;
use crate::error::DispatchError;
use crate::events::EventSinkVariant;
use crate::events::MockSink;
use crate::root_source::InMemoryRootSource;
use crate::transport::MockTransport;
use crate::transport::TransportVariant;
use crate::types::Address;
use crate::types::Authority;
use crate::types::BudgetKind;
use crate::types::Budgets;
use crate::types::Event;
use crate::types::RemoteMessage;
use crate::types::Root;

// ==================== TEST HELPERS ====================

fn addr(id: u64) -> Address {
    Address::from_low_u64(id)
}

const ADMIN: u64 = 1;

struct Harness {
    dispatcher: PropagationDispatcher<InMemoryRootSource>,
    source: InMemoryRootSource,
    transports: Vec<MockTransport>,
    sink: MockSink,
}

/// Dispatcher with `n` channels alternating messenger and tunnel families.
fn harness(n: usize) -> Harness {
    let source = InMemoryRootSource::new(Root::from(1));
    let sink = MockSink::new();
    let mut transports = Vec::new();
    let mut channels = Vec::new();

    for i in 0..n {
        let transport = MockTransport::new();
        transports.push(transport.clone());
        let destination = addr(100 + i as u64);
        let home = addr(200 + i as u64);
        let channel = if i % 2 == 0 {
            ChannelVariant::Messenger(MessengerChannel::new(
                format!("chain-{}", i),
                destination,
                home,
                TransportVariant::Mock(transport),
            ))
        } else {
            ChannelVariant::Tunnel(TunnelChannel::new(
                format!("chain-{}", i),
                destination,
                home,
                TransportVariant::Mock(transport),
            ))
        };
        channels.push(ChannelConfig::new(channel));
    }

    let dispatcher = PropagationDispatcher::new(
        addr(ADMIN),
        source.clone(),
        channels,
        EventSinkVariant::Mock(sink.clone()),
    )
    .unwrap();

    Harness {
        dispatcher,
        source,
        transports,
        sink,
    }
}

// ==================== TESTS: propagate_root ====================

#[tokio::test]
async fn test_propagate_submits_on_every_channel() -> Result<()> {
    let h = harness(3);

    let report = h.dispatcher.propagate_root_at(500).await?;

    assert!(report.is_complete());
    assert_eq!(report.submitted(), 3);
    for (i, transport) in h.transports.iter().enumerate() {
        let submitted = transport.get_submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].destination, addr(100 + i as u64));
        assert_eq!(submitted[0].budget, 100_000);

        let format = if i % 2 == 0 {
            WireFormat::Call
        } else {
            WireFormat::Tunnel
        };
        assert_eq!(
            format.decode(&submitted[0].payload)?,
            RemoteMessage::ReceiveRoot {
                root: Root::from(1),
                observed_at: 500,
            }
        );
    }

    let propagated = h
        .sink
        .get_events()
        .into_iter()
        .filter(|e| matches!(e, Event::RootPropagated { .. }))
        .count();
    assert_eq!(propagated, 3);
    Ok(())
}

#[tokio::test]
async fn test_failed_channel_does_not_block_others() -> Result<()> {
    let h = harness(3);
    h.transports[1].set_failing(true);

    let report = h.dispatcher.propagate_root_at(10).await?;

    assert!(!report.is_complete());
    assert_eq!(report.submitted(), 2);
    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].channel, "chain-1");
    assert!(matches!(
        failures[0].result,
        Err(ChannelError::Transport(_))
    ));

    assert_eq!(h.transports[0].get_submitted().len(), 1);
    assert!(h.transports[1].get_submitted().is_empty());
    assert_eq!(h.transports[2].get_submitted().len(), 1);

    let events = h.sink.get_events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| !matches!(
        e,
        Event::RootPropagated { channel, .. } if channel == "chain-1"
    )));
    Ok(())
}

#[tokio::test]
async fn test_propagates_whatever_source_reports() -> Result<()> {
    let h = harness(1);
    h.source.set(Root::from(77));

    h.dispatcher.propagate_root_at(1).await?;

    let payload = &h.transports[0].get_submitted()[0].payload;
    assert_eq!(
        WireFormat::Call.decode(payload)?,
        RemoteMessage::ReceiveRoot {
            root: Root::from(77),
            observed_at: 1,
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_propagate_uses_propagate_budget() -> Result<()> {
    let mut h = harness(2);
    h.dispatcher
        .set_execution_budget(addr(ADMIN), BudgetKind::Propagate, 250_000)?;
    h.dispatcher
        .set_execution_budget(addr(ADMIN), BudgetKind::Expiry, 30_000)?;

    h.dispatcher.propagate_root_at(1).await?;
    h.dispatcher.set_remote_expiry_window(addr(ADMIN), 60).await?;

    for transport in &h.transports {
        let budgets: Vec<u64> = transport.get_submitted().iter().map(|s| s.budget).collect();
        assert_eq!(budgets, vec![250_000, 30_000]);
    }
    Ok(())
}

// ==================== TESTS: propagate_once ====================

#[tokio::test]
async fn test_propagate_once_skips_unchanged_root() -> Result<()> {
    let h = harness(2);
    let transports = h.transports.clone();
    let source = h.source.clone();
    let dispatcher = Mutex::new(h.dispatcher);

    let last = PropagationDispatcher::propagate_once(&dispatcher, None).await?;
    assert_eq!(last, Some(Root::from(1)));

    let last = PropagationDispatcher::propagate_once(&dispatcher, last).await?;
    assert_eq!(last, Some(Root::from(1)));
    assert_eq!(transports[0].get_submitted().len(), 1);

    source.set(Root::from(2));
    let last = PropagationDispatcher::propagate_once(&dispatcher, last).await?;
    assert_eq!(last, Some(Root::from(2)));
    assert_eq!(transports[0].get_submitted().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_propagate_once_retries_after_partial_failure() -> Result<()> {
    let h = harness(2);
    let transports = h.transports.clone();
    let dispatcher = Mutex::new(h.dispatcher);
    transports[1].set_failing(true);

    let last = PropagationDispatcher::propagate_once(&dispatcher, None).await?;
    assert_eq!(last, None);

    transports[1].set_failing(false);
    let last = PropagationDispatcher::propagate_once(&dispatcher, last).await?;
    assert_eq!(last, Some(Root::from(1)));

    // The healthy channel saw the root twice; the replica rejects the copy.
    assert_eq!(transports[0].get_submitted().len(), 2);
    assert_eq!(transports[1].get_submitted().len(), 1);
    Ok(())
}

// ==================== TESTS: set_execution_budget ====================

#[tokio::test]
async fn test_zero_budget_rejected_and_prior_kept() -> Result<()> {
    let mut h = harness(2);
    h.dispatcher
        .set_execution_budget(addr(ADMIN), BudgetKind::Propagate, 123)?;

    let err = h
        .dispatcher
        .set_execution_budget(addr(ADMIN), BudgetKind::Propagate, 0)
        .unwrap_err();

    assert!(matches!(err, DispatchError::ZeroBudget(BudgetKind::Propagate)));
    for i in 0..2 {
        assert_eq!(h.dispatcher.budgets(i).unwrap().propagate, 123);
    }
    Ok(())
}

#[tokio::test]
async fn test_budget_kinds_are_independent() -> Result<()> {
    let mut h = harness(1);
    h.dispatcher
        .set_execution_budget(addr(ADMIN), BudgetKind::AuthorityTransfer, 500_000)?;

    assert_eq!(
        h.dispatcher.budgets(0),
        Some(Budgets {
            propagate: 100_000,
            expiry: 100_000,
            authority_transfer: 500_000,
        })
    );
    assert_eq!(
        h.sink.get_events(),
        vec![Event::ExecutionBudgetChanged {
            channel: "chain-0".to_string(),
            kind: BudgetKind::AuthorityTransfer,
            value: 500_000,
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_channel_budget_targets_one_channel() -> Result<()> {
    let mut h = harness(2);
    h.dispatcher
        .set_channel_execution_budget(addr(ADMIN), 1, BudgetKind::Expiry, 42)?;

    assert_eq!(h.dispatcher.budgets(0).unwrap().expiry, 100_000);
    assert_eq!(h.dispatcher.budgets(1).unwrap().expiry, 42);

    assert!(matches!(
        h.dispatcher
            .set_channel_execution_budget(addr(ADMIN), 5, BudgetKind::Expiry, 42),
        Err(DispatchError::UnknownChannel(5))
    ));
    assert!(matches!(
        h.dispatcher
            .set_channel_execution_budget(addr(ADMIN), 0, BudgetKind::Expiry, 0),
        Err(DispatchError::ZeroBudget(BudgetKind::Expiry))
    ));
    Ok(())
}

#[tokio::test]
async fn test_budget_requires_admin() {
    let mut h = harness(1);
    assert!(matches!(
        h.dispatcher
            .set_execution_budget(addr(2), BudgetKind::Propagate, 1),
        Err(DispatchError::Authority(AuthorityError::Unauthorized))
    ));
    assert_eq!(h.dispatcher.budgets(0).unwrap().propagate, 100_000);
}

// ==================== TESTS: administrative forwarding ====================

#[tokio::test]
async fn test_transfer_authority_forwards_locality() -> Result<()> {
    let h = harness(2);
    let successor = Authority::Local(addr(9));

    let report = h
        .dispatcher
        .transfer_administrative_authority(addr(ADMIN), successor)
        .await?;

    assert!(report.is_complete());
    let submitted = &h.transports[1].get_submitted()[0];
    assert_eq!(submitted.budget, 100_000);
    assert_eq!(
        WireFormat::Tunnel.decode(&submitted.payload)?,
        RemoteMessage::TransferAuthority {
            authority: successor
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_transfer_authority_rejects_null_and_strangers() {
    let h = harness(2);

    assert!(matches!(
        h.dispatcher
            .transfer_administrative_authority(addr(ADMIN), Authority::CrossDomain(Address::ZERO))
            .await,
        Err(DispatchError::Authority(AuthorityError::ZeroAddress))
    ));
    assert!(matches!(
        h.dispatcher
            .transfer_administrative_authority(addr(5), Authority::Local(addr(9)))
            .await,
        Err(DispatchError::Authority(AuthorityError::Unauthorized))
    ));
    assert!(h.transports.iter().all(|t| t.get_submitted().is_empty()));
}

#[tokio::test]
async fn test_remote_expiry_window_forwarded() -> Result<()> {
    let h = harness(1);

    h.dispatcher
        .set_remote_expiry_window(addr(ADMIN), 3600)
        .await?;

    let submitted = &h.transports[0].get_submitted()[0];
    assert_eq!(
        WireFormat::Call.decode(&submitted.payload)?,
        RemoteMessage::SetExpiryWindow { window: 3600 }
    );
    assert!(matches!(
        h.dispatcher.set_remote_expiry_window(addr(2), 1).await,
        Err(DispatchError::Authority(AuthorityError::Unauthorized))
    ));
    Ok(())
}

// ==================== TESTS: home authority ====================

#[tokio::test]
async fn test_renounce_always_rejected() {
    let h = harness(1);
    assert!(matches!(
        h.dispatcher.renounce_authority(addr(ADMIN)),
        Err(DispatchError::Authority(AuthorityError::CannotRenounceAuthority))
    ));
    assert_eq!(h.dispatcher.admin(), addr(ADMIN));
}

#[tokio::test]
async fn test_home_authority_transfer() -> Result<()> {
    let mut h = harness(1);

    assert!(matches!(
        h.dispatcher.transfer_home_authority(addr(ADMIN), Address::ZERO),
        Err(DispatchError::Authority(AuthorityError::ZeroAddress))
    ));
    assert!(h.dispatcher.transfer_home_authority(addr(3), addr(3)).is_err());
    assert!(h.sink.get_events().is_empty());

    h.dispatcher.transfer_home_authority(addr(ADMIN), addr(2))?;
    assert_eq!(h.dispatcher.admin(), addr(2));
    assert_eq!(
        h.sink.get_events(),
        vec![Event::HomeAuthorityChanged {
            previous: addr(ADMIN),
            current: addr(2),
        }]
    );
    assert!(h
        .dispatcher
        .set_execution_budget(addr(ADMIN), BudgetKind::Propagate, 1)
        .is_err());
    h.dispatcher
        .set_execution_budget(addr(2), BudgetKind::Propagate, 1)?;
    Ok(())
}
