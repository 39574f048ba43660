//! # Recoverable Signatures
//!
//! Deterministic, canonical, recoverable ECDSA over secp256k1.
//!
//! The ledger never sends public keys alongside signatures. Instead every
//! signature carries a recovery id so the node can reconstruct the signer's
//! key from the digest alone, and it only accepts signatures in a
//! "canonical" form that rules out the trivially malleable variants.
//!
//! ## Signing loop
//!
//! 1. Derive a nonce with RFC 6979, mixing a 32-byte extra-data block whose
//!    first four bytes hold a little-endian attempt counter (starting at 1).
//! 2. Sign the digest, producing `(r, s, recovery_id)`.
//! 3. If `r || s` is not canonical, bump the counter and go again.
//! 4. Emit `[recovery_id + 4 + 27] ++ r ++ s`.
//!
//! Because the counter is the only source of variation the loop is fully
//! deterministic: the same key and digest always settle on the same bytes.
//! It is also bounded by [`MAX_SIGNING_ATTEMPTS`]; in practice it finishes
//! within a few iterations.

use std::fmt;

use ecdsa::hazmat::SignPrimitive;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::{FieldBytes, Scalar};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, warn};

use super::hash::sha256;
use super::keys::{PrivateKey, PublicKey};
use crate::codec::Encode;
use crate::config::{
    COMPRESSED_KEY_OFFSET, MAX_SIGNING_ATTEMPTS, RECOVERY_ID_BASE, SIGNATURE_LENGTH,
};

/// Errors during signing and recovery.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("no canonical signature found after {attempts} attempts")]
    NoCanonicalSignature { attempts: u32 },

    #[error("signing primitive failed")]
    SigningFailed,

    #[error("invalid signature length: expected 65 bytes, got {0}")]
    InvalidLength(usize),

    #[error("invalid signature header byte {0}")]
    InvalidHeader(u8),

    #[error("invalid signature encoding")]
    InvalidEncoding,

    #[error("public key recovery failed")]
    RecoveryFailed,
}

// ---------------------------------------------------------------------------
// CompactSignature
// ---------------------------------------------------------------------------

/// A 65-byte compact recoverable signature: header byte, then `r`, then `s`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompactSignature([u8; SIGNATURE_LENGTH]);

impl CompactSignature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        let array: [u8; SIGNATURE_LENGTH] = bytes
            .try_into()
            .map_err(|_| SignatureError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(s).map_err(|_| SignatureError::InvalidEncoding)?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The header byte (`recovery_id + 4 + 27` for compressed keys).
    pub fn header(&self) -> u8 {
        self.0[0]
    }

    /// The 64-byte `r || s` body.
    pub fn body(&self) -> &[u8] {
        &self.0[1..]
    }

    /// Recovery id encoded in the header. Headers `27..=30` (uncompressed)
    /// and `31..=34` (compressed) are both understood.
    pub fn recovery_id(&self) -> Result<RecoveryId, SignatureError> {
        let header = self.header();
        if !(RECOVERY_ID_BASE..RECOVERY_ID_BASE + 2 * COMPRESSED_KEY_OFFSET).contains(&header) {
            return Err(SignatureError::InvalidHeader(header));
        }
        RecoveryId::from_byte((header - RECOVERY_ID_BASE) & 0x03)
            .ok_or(SignatureError::InvalidHeader(header))
    }

    pub fn is_canonical(&self) -> bool {
        is_canonical(self.body())
    }
}

impl fmt::Debug for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "CompactSignature({}...{})", &hex_str[..10], &hex_str[122..])
    }
}

/// Signatures are appended raw: no length prefix per signature.
impl Encode for CompactSignature {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

impl Serialize for CompactSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CompactSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Canonical form
// ---------------------------------------------------------------------------

/// The ledger's canonical-signature predicate over a 64-byte `r || s`.
///
/// Both halves must have their top bit clear, and neither may start with a
/// zero byte unless the following byte needs it (i.e. has its top bit set).
pub fn is_canonical(rs: &[u8]) -> bool {
    if rs.len() != 64 {
        return false;
    }
    let half_ok = |half: &[u8]| half[0] & 0x80 == 0 && !(half[0] == 0 && half[1] & 0x80 == 0);
    half_ok(&rs[..32]) && half_ok(&rs[32..])
}

// ---------------------------------------------------------------------------
// Signing, recovery, verification
// ---------------------------------------------------------------------------

/// Sign a 32-byte digest, retrying with a fresh deterministic nonce until the
/// result is canonical.
pub fn sign_digest(key: &PrivateKey, digest: &[u8; 32]) -> Result<CompactSignature, SignatureError> {
    let scalar: &Scalar = key.signing_key().as_nonzero_scalar().as_ref();
    let prehash = FieldBytes::clone_from_slice(digest);

    for attempt in 1..=MAX_SIGNING_ATTEMPTS {
        let mut extra = [0u8; 32];
        extra[..4].copy_from_slice(&attempt.to_le_bytes());

        let (signature, recovery_id) = scalar
            .try_sign_prehashed_rfc6979::<Sha256>(&prehash, &extra)
            .map_err(|_| SignatureError::SigningFailed)?;
        let Some(recovery_id) = recovery_id else {
            debug!(attempt, "candidate without recovery id, retrying");
            continue;
        };

        let mut out = [0u8; SIGNATURE_LENGTH];
        out[1..].copy_from_slice(&signature.to_bytes());
        if !is_canonical(&out[1..]) {
            debug!(attempt, "non-canonical candidate, retrying");
            continue;
        }
        out[0] = recovery_id.to_byte() + COMPRESSED_KEY_OFFSET + RECOVERY_ID_BASE;
        debug!(attempt, header = out[0], "produced canonical signature");
        return Ok(CompactSignature(out));
    }

    warn!(attempts = MAX_SIGNING_ATTEMPTS, "gave up looking for a canonical signature");
    Err(SignatureError::NoCanonicalSignature {
        attempts: MAX_SIGNING_ATTEMPTS,
    })
}

/// Recover the signer's public key from a signature and the digest it signs.
pub fn recover(signature: &CompactSignature, digest: &[u8; 32]) -> Result<PublicKey, SignatureError> {
    let recovery_id = signature.recovery_id()?;
    let sig = Signature::from_slice(signature.body()).map_err(|_| SignatureError::InvalidEncoding)?;
    let verifying_key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;
    Ok(PublicKey::from_k256(k256::PublicKey::from(&verifying_key)))
}

/// `true` if the signature recovers to `expected` over `digest`.
///
/// Any parse or recovery failure is simply a mismatch.
pub fn verify_digest(signature: &CompactSignature, digest: &[u8; 32], expected: &PublicKey) -> bool {
    match recover(signature, digest) {
        Ok(recovered) => recovered.to_compressed() == expected.to_compressed(),
        Err(e) => {
            debug!(error = %e, "signature recovery failed");
            false
        }
    }
}

/// Sign an arbitrary message (digest = SHA-256 of the message).
pub fn sign_message(key: &PrivateKey, message: &[u8]) -> Result<CompactSignature, SignatureError> {
    sign_digest(key, &sha256(message))
}

/// Verify a signature produced by [`sign_message`].
pub fn verify_message(signature: &CompactSignature, message: &[u8], expected: &PublicKey) -> bool {
    verify_digest(signature, &sha256(message), expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    const TEST_WIF: &str = "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ";

    fn random_key(rng: &mut impl RngCore) -> PrivateKey {
        loop {
            let mut secret = [0u8; 32];
            rng.fill_bytes(&mut secret);
            if let Ok(key) = PrivateKey::from_bytes(&secret) {
                return key;
            }
        }
    }

    #[test]
    fn test_sign_and_recover() {
        let key = PrivateKey::from_wif(TEST_WIF).unwrap();
        let digest = sha256(b"limit order");
        let sig = sign_digest(&key, &digest).unwrap();
        assert_eq!(recover(&sig, &digest).unwrap(), key.public_key());
        assert!(verify_digest(&sig, &digest, &key.public_key()));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = PrivateKey::from_wif(TEST_WIF).unwrap();
        let digest = sha256(b"determinism");
        let a = sign_digest(&key, &digest).unwrap();
        let b = sign_digest(&key, &digest).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_header_byte_range() {
        let key = PrivateKey::from_wif(TEST_WIF).unwrap();
        let sig = sign_digest(&key, &sha256(b"header")).unwrap();
        assert!((31..=34).contains(&sig.header()), "header {}", sig.header());
    }

    #[test]
    fn test_random_keys_produce_canonical_recoverable_signatures() {
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let key = random_key(&mut rng);
            let mut digest = [0u8; 32];
            rng.fill_bytes(&mut digest);

            let sig = sign_digest(&key, &digest).unwrap();
            let bytes = sig.as_bytes();
            assert_eq!(bytes[1] & 0x80, 0, "r high bit set");
            assert_eq!(bytes[33] & 0x80, 0, "s high bit set");
            assert!(sig.is_canonical());
            assert_eq!(recover(&sig, &digest).unwrap(), key.public_key());
        }
    }

    #[test]
    fn test_wrong_digest_does_not_verify() {
        let key = PrivateKey::from_wif(TEST_WIF).unwrap();
        let sig = sign_digest(&key, &sha256(b"one")).unwrap();
        assert!(!verify_digest(&sig, &sha256(b"two"), &key.public_key()));
    }

    #[test]
    fn test_wrong_key_does_not_verify() {
        let key = PrivateKey::from_wif(TEST_WIF).unwrap();
        let other = random_key(&mut rand::thread_rng());
        let digest = sha256(b"who signed this");
        let sig = sign_digest(&key, &digest).unwrap();
        assert!(!verify_digest(&sig, &digest, &other.public_key()));
    }

    #[test]
    fn test_canonical_predicate() {
        let mut rs = [0x11u8; 64];
        assert!(is_canonical(&rs));

        rs[0] = 0x80;
        assert!(!is_canonical(&rs), "r high bit");

        rs[0] = 0x00;
        rs[1] = 0x7f;
        assert!(!is_canonical(&rs), "r spurious zero pad");

        rs[1] = 0x80;
        assert!(is_canonical(&rs), "r zero pad is needed here");

        rs[32] = 0x00;
        rs[33] = 0x01;
        assert!(!is_canonical(&rs), "s spurious zero pad");

        assert!(!is_canonical(&rs[..63]));
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let mut bytes = [0x11u8; 65];
        bytes[0] = 26;
        let sig = CompactSignature::from_bytes(bytes);
        assert_eq!(sig.recovery_id(), Err(SignatureError::InvalidHeader(26)));
        assert!(recover(&sig, &[0u8; 32]).is_err());
    }

    #[test]
    fn test_hex_round_trip_and_length_check() {
        let key = PrivateKey::from_wif(TEST_WIF).unwrap();
        let sig = sign_digest(&key, &sha256(b"hex")).unwrap();
        assert_eq!(CompactSignature::from_hex(&sig.to_hex()).unwrap(), sig);
        assert_eq!(
            CompactSignature::from_slice(&[0u8; 64]),
            Err(SignatureError::InvalidLength(64))
        );
    }

    #[test]
    fn test_message_signing() {
        let key = PrivateKey::from_wif(TEST_WIF).unwrap();
        let sig = sign_message(&key, b"login").unwrap();
        assert!(verify_message(&sig, b"login", &key.public_key()));
        assert!(!verify_message(&sig, b"logout", &key.public_key()));
    }
}
