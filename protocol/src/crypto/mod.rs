//! # Cryptographic Primitives
//!
//! Everything key- and signature-shaped lives here: hashes, checksummed
//! base58, secp256k1 keys and the canonical recoverable signing loop.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. The curve arithmetic, RFC 6979 and the hashes all come from the
//! RustCrypto crates. What lives here is the ledger-specific glue: checksum
//! flavours, key string formats and the canonical-signature rule.

pub mod base58;
pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{double_sha256, ripemd160, sha256};
pub use keys::{KeyError, PrefixedPublicKey, PrivateKey, PublicKey};
pub use signatures::{
    is_canonical, recover, sign_digest, sign_message, verify_digest, verify_message,
    CompactSignature, SignatureError,
};
