//! Payload encodings, one per remote protocol family.

pub mod call;
pub mod tunnel;

use serde::Deserialize;
use serde::Serialize;

use crate::error::CodecError;
use crate::types::RemoteMessage;

/// Wire format spoken by a channel and the replica behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    /// Selector plus 32-byte words, relayed by a cross-domain messenger.
    Call,
    /// Versioned JSON envelope, relayed by a state tunnel.
    Tunnel,
}

impl WireFormat {
    pub fn name(&self) -> &'static str {
        match self {
            WireFormat::Call => "call",
            WireFormat::Tunnel => "tunnel",
        }
    }

    pub fn encode(&self, message: &RemoteMessage) -> Result<Vec<u8>, CodecError> {
        match self {
            WireFormat::Call => Ok(call::encode(message)),
            WireFormat::Tunnel => tunnel::encode(message),
        }
    }

    pub fn decode(&self, payload: &[u8]) -> Result<RemoteMessage, CodecError> {
        match self {
            WireFormat::Call => call::decode(payload),
            WireFormat::Tunnel => tunnel::decode(payload),
        }
    }
}
