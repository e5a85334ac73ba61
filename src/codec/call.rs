//! Call encoding: `selector(4) || word(32)*`.
//!
//! The selector is the first four bytes of the SHA-256 digest of the remote
//! entry point's signature. Integers are big-endian and right-aligned in
//! their word; addresses are left-padded; bools occupy the last byte.

use sha2::Digest;
use sha2::Sha256;

use crate::error::CodecError;
use crate::types::Address;
use crate::types::Authority;
use crate::types::RemoteMessage;
use crate::types::Root;

const SELECTOR_LEN: usize = 4;
const WORD_LEN: usize = 32;

pub const RECEIVE_ROOT: &str = "receiveRoot(uint256,uint64)";
pub const SET_EXPIRY_WINDOW: &str = "setRootHistoryExpiry(uint64)";
pub const TRANSFER_AUTHORITY: &str = "transferOwnership(address,bool)";

pub fn selector(signature: &str) -> [u8; SELECTOR_LEN] {
    let digest = Sha256::digest(signature.as_bytes());
    let mut out = [0u8; SELECTOR_LEN];
    out.copy_from_slice(&digest[..SELECTOR_LEN]);
    out
}

fn u64_word(value: u64) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

fn address_word(address: &Address) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - 20..].copy_from_slice(&address.0);
    word
}

fn bool_word(value: bool) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - 1] = value as u8;
    word
}

fn read_u64(word: &[u8]) -> Result<u64, CodecError> {
    let (high, low) = word.split_at(WORD_LEN - 8);
    if high.iter().any(|b| *b != 0) {
        return Err(CodecError::MalformedWord("uint64"));
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(low);
    Ok(u64::from_be_bytes(bytes))
}

fn read_address(word: &[u8]) -> Result<Address, CodecError> {
    let (high, low) = word.split_at(WORD_LEN - 20);
    if high.iter().any(|b| *b != 0) {
        return Err(CodecError::MalformedWord("address"));
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(low);
    Ok(Address(bytes))
}

fn read_bool(word: &[u8]) -> Result<bool, CodecError> {
    let (high, last) = word.split_at(WORD_LEN - 1);
    if high.iter().any(|b| *b != 0) {
        return Err(CodecError::MalformedWord("bool"));
    }
    match last[0] {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(CodecError::MalformedWord("bool")),
    }
}

fn read_root(word: &[u8]) -> Root {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(word);
    Root(bytes)
}

fn call(signature: &str, words: &[[u8; WORD_LEN]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(SELECTOR_LEN + words.len() * WORD_LEN);
    out.extend_from_slice(&selector(signature));
    for word in words {
        out.extend_from_slice(word);
    }
    out
}

pub fn encode(message: &RemoteMessage) -> Vec<u8> {
    match message {
        RemoteMessage::ReceiveRoot { root, observed_at } => {
            call(RECEIVE_ROOT, &[root.0, u64_word(*observed_at)])
        }
        RemoteMessage::SetExpiryWindow { window } => call(SET_EXPIRY_WINDOW, &[u64_word(*window)]),
        RemoteMessage::TransferAuthority { authority } => call(
            TRANSFER_AUTHORITY,
            &[
                address_word(&authority.address()),
                bool_word(authority.is_local()),
            ],
        ),
    }
}

/// Split the argument section into exactly `count` words.
fn words(args: &[u8], count: usize) -> Result<Vec<&[u8]>, CodecError> {
    let expected = SELECTOR_LEN + count * WORD_LEN;
    if args.len() != count * WORD_LEN {
        return Err(CodecError::Length {
            expected,
            got: SELECTOR_LEN + args.len(),
        });
    }
    Ok(args.chunks_exact(WORD_LEN).collect())
}

pub fn decode(payload: &[u8]) -> Result<RemoteMessage, CodecError> {
    if payload.len() < SELECTOR_LEN {
        return Err(CodecError::Length {
            expected: SELECTOR_LEN,
            got: payload.len(),
        });
    }
    let (head, args) = payload.split_at(SELECTOR_LEN);
    let mut sel = [0u8; SELECTOR_LEN];
    sel.copy_from_slice(head);

    if sel == selector(RECEIVE_ROOT) {
        let w = words(args, 2)?;
        Ok(RemoteMessage::ReceiveRoot {
            root: read_root(w[0]),
            observed_at: read_u64(w[1])?,
        })
    } else if sel == selector(SET_EXPIRY_WINDOW) {
        let w = words(args, 1)?;
        Ok(RemoteMessage::SetExpiryWindow {
            window: read_u64(w[0])?,
        })
    } else if sel == selector(TRANSFER_AUTHORITY) {
        let w = words(args, 2)?;
        let address = read_address(w[0])?;
        let authority = if read_bool(w[1])? {
            Authority::Local(address)
        } else {
            Authority::CrossDomain(address)
        };
        Ok(RemoteMessage::TransferAuthority { authority })
    } else {
        Err(CodecError::UnknownSelector(sel))
    }
}
