//! # Operation Registry
//!
//! The ledger's operations are a tagged union keyed by a small integer code.
//! Here that union is a closed Rust enum: one variant per supported code,
//! each wrapping a struct whose fields are the operation's wire schema in
//! order. Adding an operation means adding a struct and one line to the
//! `operations!` table below; the compiler then points at every match that
//! needs to learn about it.
//!
//! ## Conventions inherited from the wire format
//!
//! - Every operation starts with `fee` and ends with `extensions`.
//! - Field order is the encoding order and must never change.
//! - On the wire an operation is `varint(code) ++ fields`; in JSON it is the
//!   pair `[code, {fields}]`.
//!
//! Codes that are not in the table are rejected with
//! [`OperationError::Unsupported`], never skipped.

pub mod assets;
pub mod orders;
pub mod pools;
pub mod transfer;

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::chain::AssetAmount;
use crate::codec::{write_varint, Encode};

pub use assets::{
    AssetClaimPool, AssetCreate, AssetIssue, AssetPublishFeed, AssetReserve,
    AssetUpdateFeedProducers,
};
pub use orders::{CallOrderExtensions, CallOrderUpdate, LimitOrderCancel, LimitOrderCreate};
pub use pools::{
    LiquidityPoolCreate, LiquidityPoolDelete, LiquidityPoolDeposit, LiquidityPoolExchange,
    LiquidityPoolUpdate,
};
pub use transfer::Transfer;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("unsupported operation code {0}")]
    Unsupported(u64),

    #[error("unknown operation name {0:?}")]
    UnknownName(String),

    #[error("{operation}: missing required field `{field}`")]
    MissingField {
        operation: &'static str,
        field: String,
    },

    #[error("{operation}: {reason}")]
    InvalidField {
        operation: &'static str,
        reason: String,
    },
}

macro_rules! operations {
    ($($code:literal => $variant:ident($ty:ty), $name:literal;)+) => {
        /// The kind of an operation, without its payload.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum OperationKind {
            $($variant,)+
        }

        impl OperationKind {
            /// Every supported kind, in ascending code order.
            pub const ALL: &'static [OperationKind] = &[$(OperationKind::$variant,)+];

            pub const fn code(self) -> u16 {
                match self {
                    $(OperationKind::$variant => $code,)+
                }
            }

            /// The ledger's snake_case name, as used in fee schedules.
            pub const fn name(self) -> &'static str {
                match self {
                    $(OperationKind::$variant => $name,)+
                }
            }

            pub fn from_code(code: u64) -> Result<Self, OperationError> {
                match code {
                    $($code => Ok(OperationKind::$variant),)+
                    other => Err(OperationError::Unsupported(other)),
                }
            }

            pub fn from_name(name: &str) -> Result<Self, OperationError> {
                match name {
                    $($name => Ok(OperationKind::$variant),)+
                    other => Err(OperationError::UnknownName(other.to_string())),
                }
            }
        }

        /// A supported operation with its payload.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Operation {
            $($variant($ty),)+
        }

        impl Operation {
            pub fn kind(&self) -> OperationKind {
                match self {
                    $(Operation::$variant(_) => OperationKind::$variant,)+
                }
            }

            pub fn fee(&self) -> &AssetAmount {
                match self {
                    $(Operation::$variant(op) => &op.fee,)+
                }
            }

            pub fn fee_mut(&mut self) -> &mut AssetAmount {
                match self {
                    $(Operation::$variant(op) => &mut op.fee,)+
                }
            }

            /// Build an operation from its code and JSON field object.
            pub fn from_json(code: u64, fields: serde_json::Value) -> Result<Self, OperationError> {
                let kind = OperationKind::from_code(code)?;
                match kind {
                    $(OperationKind::$variant => serde_json::from_value::<$ty>(fields)
                        .map(Operation::$variant)
                        .map_err(|e| field_error(kind, e)),)+
                }
            }

            /// The JSON field object, without the code.
            pub fn fields_json(&self) -> Result<serde_json::Value, serde_json::Error> {
                match self {
                    $(Operation::$variant(op) => serde_json::to_value(op),)+
                }
            }

            fn encode_body(&self, out: &mut Vec<u8>) {
                match self {
                    $(Operation::$variant(op) => op.encode(out),)+
                }
            }
        }

        $(
            impl From<$ty> for Operation {
                fn from(op: $ty) -> Self {
                    Operation::$variant(op)
                }
            }
        )+
    };
}

operations! {
    0 => Transfer(Transfer), "transfer";
    1 => LimitOrderCreate(LimitOrderCreate), "limit_order_create";
    2 => LimitOrderCancel(LimitOrderCancel), "limit_order_cancel";
    3 => CallOrderUpdate(CallOrderUpdate), "call_order_update";
    10 => AssetCreate(AssetCreate), "asset_create";
    13 => AssetUpdateFeedProducers(AssetUpdateFeedProducers), "asset_update_feed_producers";
    14 => AssetIssue(AssetIssue), "asset_issue";
    15 => AssetReserve(AssetReserve), "asset_reserve";
    19 => AssetPublishFeed(AssetPublishFeed), "asset_publish_feed";
    47 => AssetClaimPool(AssetClaimPool), "asset_claim_pool";
    59 => LiquidityPoolCreate(LiquidityPoolCreate), "liquidity_pool_create";
    60 => LiquidityPoolDelete(LiquidityPoolDelete), "liquidity_pool_delete";
    61 => LiquidityPoolDeposit(LiquidityPoolDeposit), "liquidity_pool_deposit";
    63 => LiquidityPoolExchange(LiquidityPoolExchange), "liquidity_pool_exchange";
    75 => LiquidityPoolUpdate(LiquidityPoolUpdate), "liquidity_pool_update";
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl Operation {
    pub fn code(&self) -> u16 {
        self.kind().code()
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Split serde's flat error message into our taxonomy.
fn field_error(kind: OperationKind, err: serde_json::Error) -> OperationError {
    let message = err.to_string();
    if let Some(rest) = message.strip_prefix("missing field `") {
        if let Some((field, _)) = rest.split_once('`') {
            return OperationError::MissingField {
                operation: kind.name(),
                field: field.to_string(),
            };
        }
    }
    OperationError::InvalidField {
        operation: kind.name(),
        reason: message,
    }
}

/// `varint(code) ++ fields`.
impl Encode for Operation {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(u64::from(self.code()), out);
        self.encode_body(out);
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.fields_json().map_err(serde::ser::Error::custom)?;
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.code())?;
        tuple.serialize_element(&fields)?;
        tuple.end()
    }
}

struct OperationVisitor;

impl<'de> Visitor<'de> for OperationVisitor {
    type Value = Operation;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an operation as [code, {fields}]")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Operation, A::Error> {
        let code: u64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let fields: serde_json::Value = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(3, &self));
        }
        Operation::from_json(code, fields).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(OperationVisitor)
    }
}
