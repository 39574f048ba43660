//! The empty `extensions` list.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{write_varint, Encode};

/// The `extensions` field that closes almost every ledger structure.
///
/// None of the extensions we emit carry data, so this is always the empty
/// list on the wire (`0x00`). Incoming JSON may spell it `[]`, `{}` or
/// `null`; anything non-empty is refused rather than silently dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extensions;

impl Encode for Extensions {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(0, out);
    }
}

impl Serialize for Extensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(std::iter::empty::<()>())
    }
}

struct ExtensionsVisitor;

impl<'de> Visitor<'de> for ExtensionsVisitor {
    type Value = Extensions;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an empty extensions list")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Extensions, E> {
        Ok(Extensions)
    }

    fn visit_none<E: de::Error>(self) -> Result<Extensions, E> {
        Ok(Extensions)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Extensions, A::Error> {
        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::custom("non-empty extensions are not supported"));
        }
        Ok(Extensions)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Extensions, A::Error> {
        if map.next_key::<IgnoredAny>()?.is_some() {
            return Err(de::Error::custom("non-empty extensions are not supported"));
        }
        Ok(Extensions)
    }
}

impl<'de> Deserialize<'de> for Extensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ExtensionsVisitor)
    }
}
