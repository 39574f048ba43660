//! # Transfer Memos
//!
//! A memo carries an (already encrypted) message between two public keys.
//! Encryption is somebody else's problem: by the time a memo gets here the
//! message is opaque bytes and the nonce has been chosen.
//!
//! The node treats an empty memo as no memo at all, and so do we. A memo
//! whose message is empty, or a memo field given as `""` or `null`, becomes
//! `None` and is left out of both the binary encoding and the JSON sent back
//! to the node for its reference serialization.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use super::lenient::int_or_string;
use crate::codec::{encode_fields, write_varint, Encode};
use crate::crypto::PrefixedPublicKey;

/// An opaque memo payload: varint length, raw bytes; hex in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemoMessage(pub Vec<u8>);

impl Encode for MemoMessage {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.0.len() as u64, out);
        out.extend_from_slice(&self.0);
    }
}

impl Serialize for MemoMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for MemoMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        hex::decode(raw.trim()).map(Self).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub from: PrefixedPublicKey,
    pub to: PrefixedPublicKey,
    #[serde(
        serialize_with = "serialize_nonce",
        deserialize_with = "int_or_string"
    )]
    pub nonce: u64,
    pub message: MemoMessage,
}

encode_fields!(Memo {
    from,
    to,
    nonce,
    message
});

impl Memo {
    /// Collapse a memo with nothing in it to `None`.
    pub fn non_empty(self) -> Option<Self> {
        if self.message.0.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Nonces are full u64s; emit them as strings so no JSON consumer rounds
/// them through a double.
fn serialize_nonce<S: Serializer>(nonce: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(nonce)
}

/// Deserializer for optional memo fields: absent, `null`, `""` and memos
/// with empty messages all become `None`.
pub fn deserialize_optional_memo<'de, D>(deserializer: D) -> Result<Option<Memo>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Memo(Memo),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Text(text)) if text.is_empty() => Ok(None),
        Some(Raw::Text(_)) => Err(de::Error::custom(
            "memo must be an object or an empty string",
        )),
        Some(Raw::Memo(memo)) => Ok(memo.non_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FROM: &str = "BTS6UUbAGbTLLWfY2gAc8XmjGBz2c7WT4fYB5r1L1aHDwAY88ujex";
    const TO: &str = "BTS5p78kHbL33Rn3JWkTWRE2B9uz6gy4r1KbfAKLNQGE3ovMBS5bu";

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_optional_memo")]
        memo: Option<Memo>,
    }

    fn memo_json(message: &str) -> String {
        format!(r#"{{"memo":{{"from":"{FROM}","to":"{TO}","nonce":"7","message":"{message}"}}}}"#)
    }

    #[test]
    fn test_memo_encoding_layout() {
        let holder: Holder = serde_json::from_str(&memo_json("deadbeef")).unwrap();
        let memo = holder.memo.unwrap();
        let bytes = memo.to_bytes();
        assert_eq!(bytes.len(), 33 + 33 + 8 + 1 + 4);
        assert_eq!(hex::encode(&bytes[..33]), memo.from.key().to_hex());
        assert_eq!(&bytes[66..74], &7u64.to_le_bytes());
        assert_eq!(&bytes[74..], &[4, 0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_empty_memos_collapse_to_none() {
        let absent: Holder = serde_json::from_str("{}").unwrap();
        assert!(absent.memo.is_none());
        let null: Holder = serde_json::from_str(r#"{"memo":null}"#).unwrap();
        assert!(null.memo.is_none());
        let empty: Holder = serde_json::from_str(r#"{"memo":""}"#).unwrap();
        assert!(empty.memo.is_none());
        let blank: Holder = serde_json::from_str(&memo_json("")).unwrap();
        assert!(blank.memo.is_none());
    }

    #[test]
    fn test_non_empty_text_is_rejected() {
        assert!(serde_json::from_str::<Holder>(r#"{"memo":"hello"}"#).is_err());
    }

    #[test]
    fn test_nonce_serializes_as_string() {
        let holder: Holder = serde_json::from_str(&memo_json("00")).unwrap();
        let json = serde_json::to_value(holder.memo.unwrap()).unwrap();
        assert_eq!(json["nonce"], "7");
        assert_eq!(json["from"], FROM);
    }
}
