//! # Hashing Utilities
//!
//! The ledger leans on three hashes and refuses to tell you why it needs
//! all three:
//!
//! - **SHA-256**: transaction digests (`sha256(chain_id ++ bytes)`) and,
//!   truncated to 20 bytes, transaction ids.
//! - **double SHA-256**: the 4-byte checksum of wallet-import-format keys,
//!   inherited from Bitcoin.
//! - **RIPEMD-160**: the 4-byte checksum on prefixed public key strings.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use graphene_signing::crypto::sha256;
///
/// let hash = sha256(b"graphene");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA-256 over several slices without concatenating them first.
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// `SHA-256(SHA-256(data))`, used for WIF checksums.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// RIPEMD-160, used for public key string checksums.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}
