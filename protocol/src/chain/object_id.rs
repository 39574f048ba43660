//! # Object References
//!
//! Every ledger entity is named by an `a.b.c` triple: protocol space, object
//! type and instance. `1.2.100` is account #100, `1.3.0` is the core asset,
//! `1.19.42` is liquidity pool #42.
//!
//! Only the instance ever reaches the wire (as a varint); space and type
//! exist so that a seller field can refuse to hold an asset id. The typed
//! wrappers below ([`AccountId`], [`AssetId`], [`LimitOrderId`], [`PoolId`])
//! enforce that at parse time, so a schema that asks for an account simply
//! cannot be handed anything else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::codec::{write_varint, Encode};
use crate::config::{
    ACCOUNT_OBJECT_TYPE, ASSET_OBJECT_TYPE, LIMIT_ORDER_OBJECT_TYPE, LIQUIDITY_POOL_OBJECT_TYPE,
    PROTOCOL_SPACE,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObjectIdError {
    #[error("malformed object id {0:?}: expected space.type.instance")]
    Malformed(String),

    #[error("object id {id} is not a {expected} (expected {space}.{type_id}.x)")]
    WrongType {
        id: String,
        expected: &'static str,
        space: u8,
        type_id: u8,
    },
}

/// An untyped `space.type.instance` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId {
    pub space: u8,
    pub type_id: u8,
    pub instance: u64,
}

impl ObjectId {
    pub const fn new(space: u8, type_id: u8, instance: u64) -> Self {
        Self {
            space,
            type_id,
            instance,
        }
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ObjectIdError::Malformed(s.to_string());
        let mut parts = s.split('.');
        let (Some(space), Some(type_id), Some(instance), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        // Reject signs and whitespace that `parse` would otherwise let through.
        let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !(digits(space) && digits(type_id) && digits(instance)) {
            return Err(malformed());
        }
        Ok(Self {
            space: space.parse().map_err(|_| malformed())?,
            type_id: type_id.parse().map_err(|_| malformed())?,
            instance: instance.parse().map_err(|_| malformed())?,
        })
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.space, self.type_id, self.instance)
    }
}

/// Only the instance is serialized.
impl Encode for ObjectId {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.instance, out);
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

macro_rules! typed_object_id {
    ($(#[$meta:meta])* $name:ident, $type_id:expr, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            pub const TYPE_ID: u8 = $type_id;

            pub const fn new(instance: u64) -> Self {
                Self(instance)
            }

            pub const fn instance(&self) -> u64 {
                self.0
            }

            pub const fn object_id(&self) -> ObjectId {
                ObjectId::new(PROTOCOL_SPACE, $type_id, self.0)
            }
        }

        impl TryFrom<ObjectId> for $name {
            type Error = ObjectIdError;

            fn try_from(id: ObjectId) -> Result<Self, Self::Error> {
                if id.space != PROTOCOL_SPACE || id.type_id != $type_id {
                    return Err(ObjectIdError::WrongType {
                        id: id.to_string(),
                        expected: $label,
                        space: PROTOCOL_SPACE,
                        type_id: $type_id,
                    });
                }
                Ok(Self(id.instance))
            }
        }

        impl FromStr for $name {
            type Err = ObjectIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<ObjectId>()?.try_into()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.object_id(), f)
            }
        }

        impl Encode for $name {
            fn encode(&self, out: &mut Vec<u8>) {
                write_varint(self.0, out);
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

typed_object_id!(
    /// An account reference, `1.2.x`.
    AccountId,
    ACCOUNT_OBJECT_TYPE,
    "account"
);
typed_object_id!(
    /// An asset reference, `1.3.x`.
    AssetId,
    ASSET_OBJECT_TYPE,
    "asset"
);
typed_object_id!(
    /// An open limit order, `1.7.x`.
    LimitOrderId,
    LIMIT_ORDER_OBJECT_TYPE,
    "limit order"
);
typed_object_id!(
    /// A liquidity pool, `1.19.x`.
    PoolId,
    LIQUIDITY_POOL_OBJECT_TYPE,
    "liquidity pool"
);

impl AssetId {
    /// The core asset, `1.3.0`.
    pub const CORE: AssetId = AssetId(0);
}
