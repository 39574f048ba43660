//! # Key Material
//!
//! secp256k1 private and public keys in the shapes the ledger expects.
//!
//! - Private keys arrive as WIF strings: `0x80 ++ secret[32]` (optionally
//!   followed by a `0x01` "compressed" marker) with a double-SHA-256
//!   checksum, all base58-encoded.
//! - Public keys travel on the wire as 33 compressed bytes and in JSON as a
//!   network prefix followed by `base58(compressed ++ ripemd160[..4])`, e.g.
//!   `BTS6UUbAGbTLLWfY2gAc8XmjGBz2c7WT4fYB5r1L1aHDwAY88ujex`.
//!
//! Derivation is plain point multiplication by the generator. There is no
//! randomness anywhere in here: the same secret always yields the same
//! public key, byte for byte.
//!
//! ## Security considerations
//!
//! - The secret scalar is zeroized when a [`PrivateKey`] is dropped (the
//!   underlying `k256::ecdsa::SigningKey` takes care of that).
//! - Secrets are never printed: `Debug` shows the public half only.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::base58::{decode_check, encode_check, Checksum};
use crate::codec::Encode;
use crate::config::{
    COMPRESSED_PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH, WIF_VERSION,
};

/// Errors that can occur while parsing or encoding key material.
///
/// Messages never include secret bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unexpected WIF version byte 0x{0:02x}")]
    InvalidVersion(u8),

    #[error("invalid secret key: not a valid secp256k1 scalar")]
    InvalidSecretKey,

    #[error("invalid public key: not a point on secp256k1")]
    InvalidPublicKey,

    #[error("public key prefix mismatch: expected {expected:?}")]
    PrefixMismatch { expected: String },
}

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// A secp256k1 signing key.
///
/// Deliberately not `Clone` or `Serialize`: a secret should be parsed, used
/// for one signing call and dropped.
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Build from a raw 32-byte secret. Zero and values at or above the
    /// curve order are rejected.
    pub fn from_bytes(secret: &[u8; SECRET_KEY_LENGTH]) -> Result<Self, KeyError> {
        let signing_key = SigningKey::from_slice(secret).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// Parse a wallet-import-format string.
    ///
    /// Accepts both the classic 37-byte payload and the 38-byte variant with
    /// a trailing `0x01` compression marker. Any checksum, version or length
    /// problem is an error; nothing is guessed.
    pub fn from_wif(wif: &str) -> Result<Self, KeyError> {
        let payload = decode_check(wif.trim(), Checksum::DoubleSha256)?;
        let secret = match payload.len() {
            33 => &payload[1..],
            34 if payload[33] == 0x01 => &payload[1..33],
            actual => {
                return Err(KeyError::InvalidLength {
                    expected: 1 + SECRET_KEY_LENGTH,
                    actual,
                })
            }
        };
        if payload[0] != WIF_VERSION {
            return Err(KeyError::InvalidVersion(payload[0]));
        }
        let signing_key = SigningKey::from_slice(secret).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// Encode as an uncompressed-form WIF string.
    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(1 + SECRET_KEY_LENGTH);
        payload.push(WIF_VERSION);
        payload.extend_from_slice(&self.signing_key.to_bytes());
        encode_check(&payload, Checksum::DoubleSha256)
    }

    /// Derive the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: k256::PublicKey::from(self.signing_key.verifying_key()),
        }
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(pub={})", self.public_key().to_hex())
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A secp256k1 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: k256::PublicKey,
}

impl PublicKey {
    /// Parse SEC1 bytes, compressed (33) or uncompressed (65).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != COMPRESSED_PUBLIC_KEY_LENGTH
            && bytes.len() != UNCOMPRESSED_PUBLIC_KEY_LENGTH
        {
            return Err(KeyError::InvalidLength {
                expected: COMPRESSED_PUBLIC_KEY_LENGTH,
                actual: bytes.len(),
            });
        }
        let inner = k256::PublicKey::from_sec1_bytes(bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { inner })
    }

    /// Parity byte followed by the x coordinate.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_PUBLIC_KEY_LENGTH] {
        let mut out = [0u8; COMPRESSED_PUBLIC_KEY_LENGTH];
        out.copy_from_slice(self.inner.to_encoded_point(true).as_bytes());
        out
    }

    /// `0x04` followed by x and y.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH] {
        let mut out = [0u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH];
        out.copy_from_slice(self.inner.to_encoded_point(false).as_bytes());
        out
    }

    /// Compressed form as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Prefixed key string, e.g. `BTS6UUb...`.
    pub fn to_address(&self, prefix: &str) -> String {
        format!("{prefix}{}", encode_check(&self.to_compressed(), Checksum::Ripemd160))
    }

    /// Parse a prefixed key string, insisting on the given prefix.
    pub fn from_address(address: &str, prefix: &str) -> Result<Self, KeyError> {
        let body = address
            .strip_prefix(prefix)
            .ok_or_else(|| KeyError::PrefixMismatch {
                expected: prefix.to_string(),
            })?;
        let bytes = decode_check(body, Checksum::Ripemd160)?;
        Self::from_sec1_bytes(&bytes)
    }

    pub(crate) fn from_k256(inner: k256::PublicKey) -> Self {
        Self { inner }
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_compressed().hash(state);
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

/// On the wire a public key is always its 33 compressed bytes, no length
/// prefix.
impl Encode for PublicKey {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_compressed());
    }
}

// ---------------------------------------------------------------------------
// PrefixedPublicKey
// ---------------------------------------------------------------------------

/// Longest network prefix we are willing to consider when splitting a key
/// string of unknown network.
const MAX_PREFIX_LEN: usize = 8;

/// A public key that remembers the network prefix it was written with, so it
/// can be handed back to the node in the same form. Used in memo fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrefixedPublicKey {
    prefix: String,
    key: PublicKey,
}

impl PrefixedPublicKey {
    pub fn new(prefix: impl Into<String>, key: PublicKey) -> Self {
        Self {
            prefix: prefix.into(),
            key,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn key(&self) -> &PublicKey {
        &self.key
    }
}

impl FromStr for PrefixedPublicKey {
    type Err = KeyError;

    /// The prefix is not known up front and base58 happily contains capital
    /// letters, so try every alphabetic prefix length and keep the first one
    /// whose checksum verifies.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alpha_len = s
            .chars()
            .take(MAX_PREFIX_LEN)
            .take_while(|c| c.is_ascii_alphabetic())
            .count();
        let mut last_error = KeyError::PrefixMismatch {
            expected: "alphabetic network prefix".to_string(),
        };
        for split in 1..=alpha_len {
            let (prefix, _) = s.split_at(split);
            match PublicKey::from_address(s, prefix) {
                Ok(key) => return Ok(Self::new(prefix, key)),
                Err(e) => last_error = e,
            }
        }
        Err(last_error)
    }
}

impl fmt::Display for PrefixedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key.to_address(&self.prefix))
    }
}

impl Encode for PrefixedPublicKey {
    fn encode(&self, out: &mut Vec<u8>) {
        self.key.encode(out);
    }
}

impl Serialize for PrefixedPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PrefixedPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
