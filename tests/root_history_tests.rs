use ::rootrelay::error::RootError;
use ::rootrelay::root_history::RootHistory;
use ::rootrelay::root_history::RootStatus;
use ::rootrelay::types::Root;
use anyhow::Result;
use proptest::prelude::*;

// ===== Test Helper Functions =====

const HOUR: u64 = 3600;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

fn r(id: u64) -> Root {
    Root::from(id)
}

// ===== Scenarios =====

#[test]
fn test_fresh_root_supersedes_and_expires() -> Result<()> {
    let mut history = RootHistory::new(WEEK);
    history.accept_root(r(0xA), 1_000)?;
    history.accept_root(r(0xB), 2_000)?;

    assert_eq!(history.latest_root(), r(0xB));
    assert!(history.is_valid_root(&r(0xA), 2_000 + DAY).is_ok());
    assert!(history.is_valid_root(&r(0xB), 2_000 + DAY).is_ok());

    // A expires exactly one second past superseded_at + window.
    assert!(history.is_valid_root(&r(0xA), 2_000 + WEEK).is_ok());
    assert!(matches!(
        history.is_valid_root(&r(0xA), 2_000 + WEEK + 1),
        Err(RootError::ExpiredRoot { .. })
    ));
    // The head never expires.
    assert!(history.is_valid_root(&r(0xB), u64::MAX).is_ok());
    Ok(())
}

#[test]
fn test_duplicate_and_zero_rejected() -> Result<()> {
    let mut history = RootHistory::new(WEEK);
    history.accept_root(r(0xA), 1_000)?;
    history.accept_root(r(0xB), 2_000)?;

    assert_eq!(
        history.accept_root(r(0xA), 3_000),
        Err(RootError::DuplicateRoot(r(0xA)))
    );
    assert_eq!(
        history.accept_root(r(0xB), 3_000),
        Err(RootError::DuplicateRoot(r(0xB)))
    );
    assert_eq!(history.accept_root(Root::ZERO, 3_000), Err(RootError::ZeroRoot));

    // Rejections leave state untouched.
    assert_eq!(history.latest_root(), r(0xB));
    assert_eq!(history.len(), 2);
    Ok(())
}

#[test]
fn test_expired_root_stays_a_duplicate() -> Result<()> {
    let mut history = RootHistory::new(HOUR);
    history.accept_root(r(1), 0)?;
    history.accept_root(r(2), 10)?;
    assert!(history.is_valid_root(&r(1), 10 * HOUR).is_err());

    assert_eq!(
        history.accept_root(r(1), 10 * HOUR),
        Err(RootError::DuplicateRoot(r(1)))
    );
    Ok(())
}

#[test]
fn test_window_change_is_retroactive() -> Result<()> {
    let mut history = RootHistory::new(WEEK);
    history.accept_root(r(0xA), 1_000)?;
    history.accept_root(r(0xB), 2_000)?;

    history.set_expiry_window(HOUR);
    assert!(history.is_valid_root(&r(0xA), 2_000 + HOUR + 1).is_err());

    history.set_expiry_window(DAY);
    assert!(history.is_valid_root(&r(0xA), 2_000 + HOUR + 1).is_ok());
    Ok(())
}

#[test]
fn test_unknown_root_is_non_existent() {
    let history = RootHistory::new(WEEK);
    assert_eq!(
        history.is_valid_root(&r(7), 0),
        Err(RootError::NonExistentRoot(r(7)))
    );
    assert_eq!(history.status(&r(7), 0), None);
}

#[test]
fn test_status_walks_the_lifecycle() -> Result<()> {
    let mut history = RootHistory::new(100);
    history.accept_root(r(1), 0)?;
    assert_eq!(history.status(&r(1), 50), Some(RootStatus::Current));

    history.accept_root(r(2), 1_000)?;
    assert_eq!(
        history.status(&r(1), 1_050),
        Some(RootStatus::Valid { valid_until: 1_100 })
    );
    assert_eq!(
        history.status(&r(1), 1_101),
        Some(RootStatus::Expired { valid_until: 1_100 })
    );
    assert_eq!(history.status(&r(2), 1_101), Some(RootStatus::Current));
    Ok(())
}

// ===== Properties =====

proptest! {
    #[test]
    fn prop_latest_is_last_accepted(ids in proptest::collection::hash_set(1u64..u64::MAX, 1..40)) {
        let ids: Vec<u64> = ids.into_iter().collect();
        let mut history = RootHistory::new(WEEK);
        for (i, id) in ids.iter().enumerate() {
            prop_assert!(history.accept_root(r(*id), i as u64 * 10).is_ok());
        }
        prop_assert_eq!(history.latest_root(), r(*ids.last().unwrap()));
        prop_assert_eq!(history.len(), ids.len());

        // Exactly one record, the head, lacks a supersede time.
        let heads = history.records().iter().filter(|rec| rec.superseded_at.is_none()).count();
        prop_assert_eq!(heads, 1);

        // Every accepted root is rejected on re-acceptance.
        for id in &ids {
            prop_assert_eq!(
                history.accept_root(r(*id), u64::MAX),
                Err(RootError::DuplicateRoot(r(*id)))
            );
        }
    }

    #[test]
    fn prop_expiry_matches_window(
        superseded_at in 0u64..1_000_000,
        window in 0u64..1_000_000,
        age in 0u64..2_000_000,
    ) {
        let mut history = RootHistory::new(window);
        history.accept_root(r(1), 0).unwrap();
        history.accept_root(r(2), superseded_at).unwrap();

        let now = superseded_at + age;
        let valid = history.is_valid_root(&r(1), now).is_ok();
        prop_assert_eq!(valid, age <= window);
        prop_assert!(history.is_valid_root(&r(2), now).is_ok());
    }
}
