//! # JSON-RPC Envelopes
//!
//! Graphene nodes speak a JSON-RPC dialect where every query is a `call`
//! routed to a named API:
//!
//! ```text
//! {"jsonrpc": "2.0", "method": "call", "params": ["database", "<method>", [args...]], "id": 7}
//! ```
//!
//! This module defines the envelopes, a [`Transport`] seam for whatever
//! carries them, and [`JsonRpcNode`], which implements every query trait in
//! [`crate::node`] on top of a transport.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::{
    DynamicGlobalProperties, FeeScheduleQuery, GlobalPropertiesQuery, KeyReferenceQuery,
    NodeError, ReferenceSerializer,
};
use crate::chain::{AccountId, AssetAmount, AssetId};
use crate::crypto::PrefixedPublicKey;
use crate::operations::{Operation, OperationKind};

/// API name for chain-state queries.
pub const DATABASE_API: &str = "database";

// ---------------------------------------------------------------------------
// Request / Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Always "2.0".
    pub jsonrpc: String,
    /// Always "call".
    pub method: String,
    /// `[api, method, args]`.
    pub params: serde_json::Value,
    pub id: u64,
}

impl RpcRequest {
    /// A `call` to `method` on `api` with positional `args`.
    pub fn call(id: u64, api: &str, method: &str, args: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: "call".to_string(),
            params: json!([api, method, args]),
            id,
        }
    }

    /// Name of the remote method this request invokes.
    pub fn remote_method(&self) -> Option<&str> {
        self.params.get(1).and_then(serde_json::Value::as_str)
    }
}

/// A node reply. Exactly one of `result` or `error` should be set; a reply
/// with neither is read as a `null` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: u64, result: serde_json::Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: u64, error: RpcError) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Unwrap the result, checking that the reply belongs to `expected_id`.
    pub fn into_result(self, expected_id: u64) -> Result<serde_json::Value, NodeError> {
        if self.id != expected_id {
            return Err(NodeError::Decode(format!(
                "response id {} does not match request id {expected_id}",
                self.id
            )));
        }
        if let Some(error) = self.error {
            return Err(NodeError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(self.result.unwrap_or(serde_json::Value::Null))
    }
}

/// JSON-RPC error object as graphene nodes send it. `data` usually carries
/// the fc exception stack and is kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Carries one request to a node and returns its reply.
///
/// Implementations own connection handling, timeouts and retries; they map
/// their failures onto [`NodeError::Transport`] or [`NodeError::Timeout`].
pub trait Transport {
    fn call(&self, request: &RpcRequest) -> Result<RpcResponse, NodeError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn call(&self, request: &RpcRequest) -> Result<RpcResponse, NodeError> {
        (**self).call(request)
    }
}

// ---------------------------------------------------------------------------
// JsonRpcNode
// ---------------------------------------------------------------------------

/// Typed node queries over any [`Transport`].
#[derive(Debug)]
pub struct JsonRpcNode<T> {
    transport: T,
    next_id: AtomicU64,
}

impl<T: Transport> JsonRpcNode<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Raw `call` to any API, returning the untyped result.
    pub fn call(
        &self,
        api: &str,
        method: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, NodeError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::call(id, api, method, args);
        debug!(id, api, method, "node call");
        let result = self.transport.call(&request)?.into_result(id);
        if let Err(e) = &result {
            warn!(id, method, error = %e, "node call failed");
        }
        result
    }

    /// A `database` API query with a typed result.
    pub fn database<R: DeserializeOwned>(
        &self,
        method: &str,
        args: serde_json::Value,
    ) -> Result<R, NodeError> {
        let value = self.call(DATABASE_API, method, args)?;
        serde_json::from_value(value).map_err(|e| NodeError::Decode(format!("{method}: {e}")))
    }
}

impl<T: Transport> ReferenceSerializer for JsonRpcNode<T> {
    fn get_transaction_hex(&self, tx: &serde_json::Value) -> Result<String, NodeError> {
        self.database("get_transaction_hex", json!([tx]))
    }
}

impl<T: Transport> FeeScheduleQuery for JsonRpcNode<T> {
    fn get_required_fees(
        &self,
        operations: &[Operation],
        asset: AssetId,
    ) -> Result<Vec<AssetAmount>, NodeError> {
        let ops = serde_json::to_value(operations)
            .map_err(|e| NodeError::Decode(format!("operations: {e}")))?;
        self.database("get_required_fees", json!([ops, asset]))
    }

    fn get_account_fees(
        &self,
        account: AccountId,
        kinds: &[OperationKind],
        asset: AssetId,
    ) -> Result<Vec<AssetAmount>, NodeError> {
        let templates: Vec<serde_json::Value> = kinds
            .iter()
            .map(|kind| json!([kind.code().to_string(), {"from": account}]))
            .collect();
        self.database("get_required_fees", json!([templates, asset]))
    }
}

impl<T: Transport> KeyReferenceQuery for JsonRpcNode<T> {
    fn get_key_references(
        &self,
        keys: &[PrefixedPublicKey],
    ) -> Result<Vec<Vec<AccountId>>, NodeError> {
        self.database("get_key_references", json!([keys]))
    }
}

impl<T: Transport> GlobalPropertiesQuery for JsonRpcNode<T> {
    fn get_dynamic_global_properties(&self) -> Result<DynamicGlobalProperties, NodeError> {
        self.database("get_dynamic_global_properties", json!([]))
    }
}
