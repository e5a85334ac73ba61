//! Root history state machine.
//!
//! A root's lifetime is anchored to the moment it stopped being current: it
//! stays valid for `expiry_window` seconds after the *next* root is accepted,
//! whatever its own insertion time was.

use std::collections::HashMap;

use tracing::debug;

use crate::error::RootError;
use crate::types::Root;
use crate::types::RootRecord;
use crate::types::Timestamp;
use crate::types::DEFAULT_EXPIRY_WINDOW_SECS;

/// Where a root sits in its lifecycle at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootStatus {
    /// The head of the history. Never expires.
    Current,
    /// Superseded, still inside the grace window.
    Valid { valid_until: Timestamp },
    /// Superseded and past the grace window.
    Expired { valid_until: Timestamp },
}

/// Append-only record of accepted roots for one replica.
#[derive(Debug, Clone)]
pub struct RootHistory {
    latest: Root,
    records: Vec<RootRecord>,
    /// Position of each root in `records`.
    index: HashMap<Root, usize>,
    expiry_window: u64,
}

impl Default for RootHistory {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRY_WINDOW_SECS)
    }
}

impl RootHistory {
    /// Empty history with the given expiry window in seconds.
    pub fn new(expiry_window: u64) -> Self {
        Self {
            latest: Root::ZERO,
            records: Vec::new(),
            index: HashMap::new(),
            expiry_window,
        }
    }

    /// Rebuild a history from persisted records, re-checking every invariant.
    pub fn restore(records: Vec<RootRecord>, expiry_window: u64) -> Result<Self, RootError> {
        let mut index = HashMap::with_capacity(records.len());
        let last = records.len().saturating_sub(1);

        for (pos, record) in records.iter().enumerate() {
            if record.root.is_zero() {
                return Err(RootError::CorruptHistory(format!(
                    "zero root at position {}",
                    pos
                )));
            }
            if index.insert(record.root, pos).is_some() {
                return Err(RootError::CorruptHistory(format!(
                    "root {} appears twice",
                    record.root
                )));
            }
            let is_head = pos == last;
            if is_head != record.superseded_at.is_none() {
                return Err(RootError::CorruptHistory(format!(
                    "record {} at position {} has wrong head marker",
                    record.root, pos
                )));
            }
        }

        let latest = records.last().map(|r| r.root).unwrap_or(Root::ZERO);
        Ok(Self {
            latest,
            records,
            index,
            expiry_window,
        })
    }

    /// Check whether `candidate` would be accepted, without mutating anything.
    pub fn check_accept(&self, candidate: &Root) -> Result<(), RootError> {
        if candidate.is_zero() {
            return Err(RootError::ZeroRoot);
        }
        if self.index.contains_key(candidate) {
            return Err(RootError::DuplicateRoot(*candidate));
        }
        Ok(())
    }

    /// Accept `candidate` as the new head.
    ///
    /// The previous head, if any, starts its expiry countdown at `observed_at`.
    pub fn accept_root(
        &mut self,
        candidate: Root,
        observed_at: Timestamp,
    ) -> Result<(), RootError> {
        self.check_accept(&candidate)?;

        if let Some(head) = self.records.last_mut() {
            head.superseded_at = Some(observed_at);
        }
        self.index.insert(candidate, self.records.len());
        self.records.push(RootRecord {
            root: candidate,
            superseded_at: None,
        });
        self.latest = candidate;

        debug!(
            "Accepted root {} at {} (history length {})",
            candidate,
            observed_at,
            self.records.len()
        );
        Ok(())
    }

    /// Succeeds if `candidate` is an acceptable verification target at `now`.
    pub fn is_valid_root(&self, candidate: &Root, now: Timestamp) -> Result<(), RootError> {
        match self.status(candidate, now) {
            None => Err(RootError::NonExistentRoot(*candidate)),
            Some(RootStatus::Current) | Some(RootStatus::Valid { .. }) => Ok(()),
            Some(RootStatus::Expired { .. }) => {
                // status() only reports Expired for superseded records.
                let superseded_at = self
                    .record(candidate)
                    .and_then(|r| r.superseded_at)
                    .unwrap_or_default();
                Err(RootError::ExpiredRoot {
                    root: *candidate,
                    superseded_at,
                    window: self.expiry_window,
                    now,
                })
            }
        }
    }

    /// Lifecycle state of `candidate` at `now`, or `None` if never accepted.
    pub fn status(&self, candidate: &Root, now: Timestamp) -> Option<RootStatus> {
        let record = self.record(candidate)?;
        if record.root == self.latest {
            return Some(RootStatus::Current);
        }
        let superseded_at = record.superseded_at?;
        let valid_until = superseded_at.saturating_add(self.expiry_window);
        // A clock behind the supersede instant counts as age zero.
        if now.saturating_sub(superseded_at) > self.expiry_window {
            Some(RootStatus::Expired { valid_until })
        } else {
            Some(RootStatus::Valid { valid_until })
        }
    }

    /// Last instant at which a superseded root is still valid.
    ///
    /// `Ok(None)` for the current head, which has no deadline.
    pub fn valid_until(&self, candidate: &Root) -> Result<Option<Timestamp>, RootError> {
        let record = self
            .record(candidate)
            .ok_or(RootError::NonExistentRoot(*candidate))?;
        Ok(record
            .superseded_at
            .map(|t| t.saturating_add(self.expiry_window)))
    }

    /// Replace the expiry window. Applies to every record, including ones
    /// superseded before the change. Returns the previous window.
    pub fn set_expiry_window(&mut self, window: u64) -> u64 {
        std::mem::replace(&mut self.expiry_window, window)
    }

    pub fn latest_root(&self) -> Root {
        self.latest
    }

    pub fn expiry_window(&self) -> u64 {
        self.expiry_window
    }

    pub fn record(&self, root: &Root) -> Option<&RootRecord> {
        self.index.get(root).map(|&pos| &self.records[pos])
    }

    /// Records in acceptance order.
    pub fn records(&self) -> &[RootRecord] {
        &self.records
    }

    pub fn head(&self) -> Option<&RootRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
