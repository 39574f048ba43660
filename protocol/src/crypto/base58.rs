//! # Checksummed Base58
//!
//! Two flavours, because the ledger inherited one from Bitcoin and invented
//! the other:
//!
//! - **WIF**: `base58(payload ++ double_sha256(payload)[..4])`.
//! - **Key strings**: `base58(payload ++ ripemd160(payload)[..4])`.
//!
//! Both use the Bitcoin alphabet (no `0`, `O`, `I` or `l`).

use super::hash::{double_sha256, ripemd160};
use super::keys::KeyError;

const CHECKSUM_LEN: usize = 4;

/// Which checksum guards the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checksum {
    DoubleSha256,
    Ripemd160,
}

impl Checksum {
    fn compute(self, payload: &[u8]) -> [u8; CHECKSUM_LEN] {
        let mut out = [0u8; CHECKSUM_LEN];
        match self {
            Checksum::DoubleSha256 => out.copy_from_slice(&double_sha256(payload)[..CHECKSUM_LEN]),
            Checksum::Ripemd160 => out.copy_from_slice(&ripemd160(payload)[..CHECKSUM_LEN]),
        }
        out
    }
}

/// Append the checksum and base58-encode.
pub fn encode_check(payload: &[u8], checksum: Checksum) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum.compute(payload));
    bs58::encode(data).into_string()
}

/// Base58-decode, verify and strip the checksum.
pub fn decode_check(encoded: &str, checksum: Checksum) -> Result<Vec<u8>, KeyError> {
    let mut data = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| KeyError::InvalidBase58(e.to_string()))?;
    if data.len() <= CHECKSUM_LEN {
        return Err(KeyError::InvalidLength {
            expected: CHECKSUM_LEN + 1,
            actual: data.len(),
        });
    }
    let split = data.len() - CHECKSUM_LEN;
    let expected = checksum.compute(&data[..split]);
    if data[split..] != expected {
        return Err(KeyError::ChecksumMismatch);
    }
    data.truncate(split);
    Ok(data)
}
