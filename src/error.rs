use thiserror::Error;

use crate::types::Address;
use crate::types::BudgetKind;
use crate::types::GasUnits;
use crate::types::Root;
use crate::types::Timestamp;

/// Rejections raised by a replica's root history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RootError {
    #[error("root must not be zero")]
    ZeroRoot,

    #[error("root {0} was already accepted")]
    DuplicateRoot(Root),

    #[error("root {0} is not in the history")]
    NonExistentRoot(Root),

    #[error("root {root} expired: superseded at {superseded_at}, window {window}s, now {now}")]
    ExpiredRoot {
        root: Root,
        superseded_at: Timestamp,
        window: u64,
        now: Timestamp,
    },

    #[error("corrupt history: {0}")]
    CorruptHistory(String),
}

/// Failures reported by a transport for a single submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport to {destination} is closed")]
    Closed { destination: Address },

    #[error("transport rejected message to {destination}: {reason}")]
    Rejected { destination: Address, reason: String },
}

/// Payload encoding and decoding failures.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unknown selector 0x{}", hex::encode(.0))]
    UnknownSelector([u8; 4]),

    #[error("payload length mismatch: expected {expected} bytes, got {got}")]
    Length { expected: usize, got: usize },

    #[error("malformed {0} word")]
    MalformedWord(&'static str),

    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u8),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to hand a message to one channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error(transparent)]
    Encode(#[from] CodecError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Administrative role violations, shared by both sides of the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    #[error("caller is not the administrative authority")]
    Unauthorized,

    #[error("address must not be zero")]
    ZeroAddress,

    #[error("administrative authority cannot be renounced")]
    CannotRenounceAuthority,
}

/// Errors returned by the home-side dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error("{0} budget must not be zero")]
    ZeroBudget(BudgetKind),

    #[error("no channel at index {0}")]
    UnknownChannel(usize),

    #[error("root source failed: {0:#}")]
    RootSource(anyhow::Error),
}

/// Errors returned by a replica host.
#[derive(Debug, Error)]
pub enum ReplicaError {
    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error(transparent)]
    Root(#[from] RootError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("delivery addressed to {got}, this replica is {expected}")]
    WrongDestination { expected: Address, got: Address },

    #[error("out of budget: required {required}, supplied {supplied}")]
    OutOfBudget {
        required: GasUnits,
        supplied: GasUnits,
    },

    #[error("storage: {0:#}")]
    Storage(anyhow::Error),
}
