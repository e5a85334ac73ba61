use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Execution budget charged by a transport for remote execution.
pub type GasUnits = u64;

/// Default expiry window for superseded roots: 7 days in seconds.
pub const DEFAULT_EXPIRY_WINDOW_SECS: u64 = 7 * 24 * 3600;

/// Default execution budget for every message kind.
pub const DEFAULT_BUDGET: GasUnits = 100_000;

/// Errors produced while parsing hex identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIdError {
    #[error("invalid hex: {0}")]
    Hex(String),

    #[error("expected at most {max} bytes, got {got}")]
    TooLong { max: usize, got: usize },
}

fn parse_fixed<const N: usize>(s: &str) -> Result<[u8; N], ParseIdError> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    // Odd-length input is accepted as if left-padded with a zero nibble.
    let padded;
    let s = if s.len() % 2 == 1 {
        padded = format!("0{}", s);
        padded.as_str()
    } else {
        s
    };
    let raw = hex::decode(s).map_err(|e| ParseIdError::Hex(e.to_string()))?;
    if raw.len() > N {
        return Err(ParseIdError::TooLong {
            max: N,
            got: raw.len(),
        });
    }
    let mut out = [0u8; N];
    out[N - raw.len()..].copy_from_slice(&raw);
    Ok(out)
}

/// A commitment root.
///
/// Opaque to this crate: ordering and equality treat the bytes as an unsigned
/// big-endian integer, nothing else is inspected.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Root(pub [u8; 32]);

impl Root {
    /// Reserved value, never a valid root.
    pub const ZERO: Root = Root([0u8; 32]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<u64> for Root {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Root(bytes)
    }
}

impl From<[u8; 32]> for Root {
    fn from(bytes: [u8; 32]) -> Self {
        Root(bytes)
    }
}

impl FromStr for Root {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed::<32>(s).map(Root)
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Root({})", self)
    }
}

impl Serialize for Root {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Root {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A 20-byte account address on either ledger.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null address.
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Address whose last byte is `id`. Handy for wiring local setups.
    pub fn from_low_u64(id: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&id.to_be_bytes());
        Address(bytes)
    }
}

impl FromStr for Address {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed::<20>(s).map(Address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One entry of a replica's root history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootRecord {
    pub root: Root,
    /// When the next root replaced this one. `None` for the current head.
    pub superseded_at: Option<Timestamp>,
}

/// Holder of the administrative role.
///
/// `Local` holders call a replica directly; `CrossDomain` holders are
/// controlled from the home ledger and their calls must arrive through the
/// messaging bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "address", rename_all = "snake_case")]
pub enum Authority {
    Local(Address),
    CrossDomain(Address),
}

impl Authority {
    pub fn address(&self) -> Address {
        match self {
            Authority::Local(a) | Authority::CrossDomain(a) => *a,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Authority::Local(_))
    }
}

/// Where a call into a replica came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Called directly by an account on the replica's own ledger.
    Direct(Address),
    /// Relayed by a messaging bridge on behalf of a home-ledger sender.
    Bridge { messenger: Address, sender: Address },
}

/// Message kinds with independently tunable execution budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetKind {
    Propagate,
    Expiry,
    AuthorityTransfer,
}

impl fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BudgetKind::Propagate => "propagate",
            BudgetKind::Expiry => "expiry",
            BudgetKind::AuthorityTransfer => "authority_transfer",
        };
        f.write_str(s)
    }
}

/// Per-channel execution budgets, one per message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budgets {
    pub propagate: GasUnits,
    pub expiry: GasUnits,
    pub authority_transfer: GasUnits,
}

impl Budgets {
    pub fn get(&self, kind: BudgetKind) -> GasUnits {
        match kind {
            BudgetKind::Propagate => self.propagate,
            BudgetKind::Expiry => self.expiry,
            BudgetKind::AuthorityTransfer => self.authority_transfer,
        }
    }

    pub fn set(&mut self, kind: BudgetKind, value: GasUnits) {
        match kind {
            BudgetKind::Propagate => self.propagate = value,
            BudgetKind::Expiry => self.expiry = value,
            BudgetKind::AuthorityTransfer => self.authority_transfer = value,
        }
    }
}

impl Default for Budgets {
    fn default() -> Self {
        Budgets {
            propagate: DEFAULT_BUDGET,
            expiry: DEFAULT_BUDGET,
            authority_transfer: DEFAULT_BUDGET,
        }
    }
}

/// Message sent from the home dispatcher to a remote replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemoteMessage {
    ReceiveRoot { root: Root, observed_at: Timestamp },
    SetExpiryWindow { window: u64 },
    TransferAuthority { authority: Authority },
}

impl RemoteMessage {
    /// Budget kind this message is charged against.
    pub fn budget_kind(&self) -> BudgetKind {
        match self {
            RemoteMessage::ReceiveRoot { .. } => BudgetKind::Propagate,
            RemoteMessage::SetExpiryWindow { .. } => BudgetKind::Expiry,
            RemoteMessage::TransferAuthority { .. } => BudgetKind::AuthorityTransfer,
        }
    }
}

/// Unit handed from a transport to the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Bridge contract that relays the message on the remote ledger.
    pub messenger: Address,
    /// Home-ledger account that submitted the message.
    pub sender: Address,
    pub destination: Address,
    pub budget: GasUnits,
    pub payload: Vec<u8>,
}

/// Observable notifications. Nothing inside the crate consumes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// The dispatcher handed a root to one channel's transport.
    RootPropagated {
        channel: String,
        destination: Address,
        root: Root,
        observed_at: Timestamp,
    },
    /// The dispatcher forwarded an expiry window change to one channel.
    RemoteExpiryWindowSent {
        channel: String,
        destination: Address,
        window: u64,
    },
    /// The dispatcher forwarded an authority transfer to one channel.
    AuthorityTransferSent {
        channel: String,
        destination: Address,
        authority: Authority,
    },
    ExecutionBudgetChanged {
        channel: String,
        kind: BudgetKind,
        value: GasUnits,
    },
    /// The dispatcher's own administrative role changed hands.
    HomeAuthorityChanged { previous: Address, current: Address },
    /// A replica accepted a root. `superseded` carries the previous head and
    /// the last instant at which it is still valid.
    RootAccepted {
        replica: Address,
        root: Root,
        observed_at: Timestamp,
        superseded: Option<(Root, Timestamp)>,
    },
    ExpiryWindowChanged {
        replica: Address,
        previous: u64,
        current: u64,
    },
    AuthorityChanged {
        replica: Address,
        previous: Authority,
        current: Authority,
    },
}
