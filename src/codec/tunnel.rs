//! Tunnel encoding: a versioned JSON envelope.

use serde::Deserialize;
use serde::Serialize;

use crate::error::CodecError;
use crate::types::RemoteMessage;

pub const VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u8,
    message: RemoteMessage,
}

#[derive(Debug, Deserialize)]
struct VersionProbe {
    version: u8,
}

pub fn encode(message: &RemoteMessage) -> Result<Vec<u8>, CodecError> {
    let envelope = Envelope {
        version: VERSION,
        message: *message,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

pub fn decode(payload: &[u8]) -> Result<RemoteMessage, CodecError> {
    let probe: VersionProbe = serde_json::from_slice(payload)?;
    if probe.version != VERSION {
        return Err(CodecError::UnsupportedVersion(probe.version));
    }
    let envelope: Envelope = serde_json::from_slice(payload)?;
    Ok(envelope.message)
}
