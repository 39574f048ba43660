//! # Protocol Configuration & Constants
//!
//! Every magic number the signer depends on lives here. Most of them are not
//! ours to choose: they are baked into the ledger's wire format and the node
//! will reject anything that disagrees with them, so "tuning" is not a thing.
//!
//! The one piece of configuration that genuinely varies is the target
//! network, captured by [`ChainParams`]. It is always passed explicitly into
//! digest, signing and verification calls; nothing in this crate reaches for
//! a global network setting.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Chain id of the BitShares mainnet, prefixed onto every signing digest.
pub const MAINNET_CHAIN_ID: [u8; 32] = [
    0x40, 0x18, 0xd7, 0x84, 0x4c, 0x78, 0xf6, 0xa6, 0xc4, 0x1c, 0x6a, 0x55, 0x2b, 0x89, 0x80, 0x22,
    0x31, 0x0f, 0xc5, 0xde, 0xc0, 0x6d, 0xa4, 0x67, 0xee, 0x79, 0x05, 0xa8, 0xda, 0xd5, 0x12, 0xc8,
];

/// Chain id of the public testnet.
pub const TESTNET_CHAIN_ID: [u8; 32] = [
    0x39, 0xf5, 0xe2, 0xed, 0xe1, 0xf8, 0xbc, 0x1a, 0x3a, 0x54, 0xa7, 0x91, 0x44, 0x14, 0xe3, 0x77,
    0x9e, 0x33, 0x19, 0x3f, 0x1f, 0x56, 0x93, 0x51, 0x0e, 0x73, 0xcb, 0x7a, 0x87, 0x61, 0x74, 0x47,
];

/// Public key prefixes. These are purely cosmetic on the wire (keys travel
/// as 33 raw bytes) but the node's JSON API speaks prefixed strings.
pub const MAINNET_ADDRESS_PREFIX: &str = "BTS";
pub const TESTNET_ADDRESS_PREFIX: &str = "TEST";

// ---------------------------------------------------------------------------
// Object Identifiers
// ---------------------------------------------------------------------------

/// Protocol object space. Everything we reference lives in space 1.
pub const PROTOCOL_SPACE: u8 = 1;

pub const ACCOUNT_OBJECT_TYPE: u8 = 2;
pub const ASSET_OBJECT_TYPE: u8 = 3;
pub const LIMIT_ORDER_OBJECT_TYPE: u8 = 7;
pub const LIQUIDITY_POOL_OBJECT_TYPE: u8 = 19;

/// The core asset, in which all fees are denominated.
pub const CORE_ASSET_ID: &str = "1.3.0";

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// Default lifetime of a freshly built transaction. Two minutes is enough
/// for the round trip to a node and short enough that a stale transaction
/// dies before anyone notices it.
pub const DEFAULT_EXPIRATION_SECS: u32 = 120;

/// Default cap on operations per transaction. Builders refuse to exceed it.
pub const DEFAULT_MAX_OPERATIONS: usize = 100;

/// Expiration used for limit orders that should never expire. About 75
/// years out, which is still comfortably inside a u32.
pub const END_OF_TIME: u32 = 4_000_000_000;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Version byte of a wallet-import-format private key.
pub const WIF_VERSION: u8 = 0x80;

/// Raw secp256k1 secret length.
pub const SECRET_KEY_LENGTH: usize = 32;

pub const COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 65;

/// Compact recoverable signature: one header byte plus r and s.
pub const SIGNATURE_LENGTH: usize = 65;

/// Offsets added to the recovery id in the signature header byte.
/// `27` marks a recoverable signature, `4` marks a compressed key.
pub const RECOVERY_ID_BASE: u8 = 27;
pub const COMPRESSED_KEY_OFFSET: u8 = 4;

/// Upper bound on deterministic nonce retries while hunting for a canonical
/// signature. Real keys converge in a handful of attempts; hitting this
/// means something upstream is broken.
pub const MAX_SIGNING_ATTEMPTS: u32 = 1024;

// ---------------------------------------------------------------------------
// Chain Parameters
// ---------------------------------------------------------------------------

/// Per-network parameters injected into every digest and key encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    /// 32-byte chain id, hex encoded in JSON.
    #[serde(with = "hex::serde")]
    pub chain_id: [u8; 32],
    /// Prefix for human-readable public keys (`BTS`, `TEST`, ...).
    pub address_prefix: String,
}

impl ChainParams {
    pub fn mainnet() -> Self {
        Self {
            chain_id: MAINNET_CHAIN_ID,
            address_prefix: MAINNET_ADDRESS_PREFIX.to_string(),
        }
    }

    pub fn testnet() -> Self {
        Self {
            chain_id: TESTNET_CHAIN_ID,
            address_prefix: TESTNET_ADDRESS_PREFIX.to_string(),
        }
    }

    /// Chain id as lowercase hex, the way the node reports it.
    pub fn chain_id_hex(&self) -> String {
        hex::encode(self.chain_id)
    }
}

impl Default for ChainParams {
    fn default() -> Self {
        Self::mainnet()
    }
}

// ---------------------------------------------------------------------------
// Signer Configuration
// ---------------------------------------------------------------------------

/// Everything a signing front end needs to know besides the key itself.
///
/// Deserializes from JSON with every field optional except the chain, so a
/// config file can be as small as `{"chain": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerConfig {
    pub chain: ChainParams,
    #[serde(default = "default_max_operations")]
    pub max_operations: usize,
    #[serde(default = "default_expiration_secs")]
    pub expiration_secs: u32,
}

fn default_max_operations() -> usize {
    DEFAULT_MAX_OPERATIONS
}

fn default_expiration_secs() -> u32 {
    DEFAULT_EXPIRATION_SECS
}

impl SignerConfig {
    pub fn for_chain(chain: ChainParams) -> Self {
        Self {
            chain,
            max_operations: DEFAULT_MAX_OPERATIONS,
            expiration_secs: DEFAULT_EXPIRATION_SECS,
        }
    }

    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self::for_chain(ChainParams::mainnet())
    }
}

/// Returns a friendly name for a chain id, mainly for logging.
pub fn network_name(chain_id: &[u8; 32]) -> String {
    match *chain_id {
        MAINNET_CHAIN_ID => "mainnet".to_string(),
        TESTNET_CHAIN_ID => "testnet".to_string(),
        other => format!("unknown({}..)", hex::encode(&other[..4])),
    }
}
