//! # Node Contracts
//!
//! The library never opens a socket. Everything it needs from a ledger node
//! is expressed as a small synchronous trait, and callers plug in whatever
//! transport they have (a websocket client, an HTTP client, a recorded
//! fixture in tests).
//!
//! ```text
//! rpc.rs    - JSON-RPC envelopes, the Transport trait, JsonRpcNode
//! fees.rs   - FeeSchedule built from get_required_fees
//! cache.rs  - ObjectCache for symbol -> (id, precision) lookups
//! auth.rs   - authenticate: does this key control this account?
//! ```
//!
//! Node failures surface as [`NodeError`] so an orchestration layer can
//! decide whether to retry on another node or give up; nothing in here
//! rotates nodes itself.

pub mod auth;
pub mod cache;
pub mod fees;
pub mod rpc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::{AccountId, AssetAmount, AssetId};
use crate::codec::PointInTime;
use crate::crypto::PrefixedPublicKey;
use crate::operations::{Operation, OperationKind};

pub use auth::authenticate;
pub use cache::{AssetRecord, ObjectCache};
pub use fees::FeeSchedule;
pub use rpc::{JsonRpcNode, RpcError, RpcRequest, RpcResponse, Transport};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A failure talking to, or understanding, a ledger node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The transport could not deliver the request or read a reply.
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("node query timed out")]
    Timeout,

    /// The node answered with a JSON-RPC error object.
    #[error("node returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The reply arrived but did not have the expected shape.
    #[error("unexpected node response: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Query payloads
// ---------------------------------------------------------------------------

/// The subset of `get_dynamic_global_properties` needed for TaPoS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
    pub head_block_number: u32,
    /// 20-byte block id, hex.
    pub head_block_id: String,
    /// Head block timestamp.
    pub time: PointInTime,
}

// ---------------------------------------------------------------------------
// Query traits
// ---------------------------------------------------------------------------

/// `get_transaction_hex`: the node's own serialization of an unsigned
/// transaction, with an empty signature list appended.
pub trait ReferenceSerializer {
    fn get_transaction_hex(&self, tx: &serde_json::Value) -> Result<String, NodeError>;
}

/// `get_required_fees`: one fee per operation, in order, paid in `asset`.
pub trait FeeScheduleQuery {
    fn get_required_fees(
        &self,
        operations: &[Operation],
        asset: AssetId,
    ) -> Result<Vec<AssetAmount>, NodeError>;

    /// The flat fee of each kind for operations paid by `account`.
    ///
    /// Sends bare `[code, {"from": account}]` templates rather than full
    /// operations, so size-dependent fees (memos, descriptions) come back
    /// at their base rate.
    fn get_account_fees(
        &self,
        account: AccountId,
        kinds: &[OperationKind],
        asset: AssetId,
    ) -> Result<Vec<AssetAmount>, NodeError>;
}

/// `get_key_references`: for each key, the accounts that list it.
pub trait KeyReferenceQuery {
    fn get_key_references(
        &self,
        keys: &[PrefixedPublicKey],
    ) -> Result<Vec<Vec<AccountId>>, NodeError>;
}

pub trait GlobalPropertiesQuery {
    fn get_dynamic_global_properties(&self) -> Result<DynamicGlobalProperties, NodeError>;
}
