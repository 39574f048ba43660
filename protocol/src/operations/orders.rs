//! Market operations: limit orders (1, 2) and call-order updates (3).

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chain::lenient::bool_or_int;
use crate::chain::{AccountId, AssetAmount, Extensions, LimitOrderId};
use crate::codec::{encode_fields, write_varint, Encode, PointInTime, StaticVariant};

// ---------------------------------------------------------------------------
// Limit orders
// ---------------------------------------------------------------------------

/// Operation 1: offer `amount_to_sell` for at least `min_to_receive`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderCreate {
    pub fee: AssetAmount,
    pub seller: AccountId,
    pub amount_to_sell: AssetAmount,
    pub min_to_receive: AssetAmount,
    pub expiration: PointInTime,
    #[serde(deserialize_with = "bool_or_int")]
    pub fill_or_kill: bool,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(LimitOrderCreate {
    fee,
    seller,
    amount_to_sell,
    min_to_receive,
    expiration,
    fill_or_kill,
    extensions,
});

/// Operation 2: cancel an open order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderCancel {
    pub fee: AssetAmount,
    pub fee_paying_account: AccountId,
    pub order: LimitOrderId,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(LimitOrderCancel {
    fee,
    fee_paying_account,
    order,
    extensions
});

// ---------------------------------------------------------------------------
// Call orders
// ---------------------------------------------------------------------------

/// The keyed extension block of a call-order update.
///
/// Unlike the usual empty list, this one can carry a target collateral
/// ratio. On the wire it is a list of static variants, each tagged with the
/// option's index (`target_collateral_ratio` is index 0). In JSON it is an
/// object: `{"target_collateral_ratio": 2000}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOrderExtensions {
    pub target_collateral_ratio: Option<u16>,
}

const TARGET_COLLATERAL_RATIO: &str = "target_collateral_ratio";

impl Encode for CallOrderExtensions {
    fn encode(&self, out: &mut Vec<u8>) {
        match self.target_collateral_ratio {
            None => write_varint(0, out),
            Some(ratio) => {
                write_varint(1, out);
                // A zero ratio travels as an empty optional payload.
                if ratio == 0 {
                    StaticVariant::new(0, None::<u16>).encode(out);
                } else {
                    StaticVariant::new(0, ratio).encode(out);
                }
            }
        }
    }
}

impl Serialize for CallOrderExtensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = usize::from(self.target_collateral_ratio.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(ratio) = self.target_collateral_ratio {
            map.serialize_entry(TARGET_COLLATERAL_RATIO, &ratio)?;
        }
        map.end()
    }
}

struct CallOrderExtensionsVisitor;

impl<'de> Visitor<'de> for CallOrderExtensionsVisitor {
    type Value = CallOrderExtensions;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a call order extension object")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(CallOrderExtensions::default())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::custom(
                "call order extensions must be given as an object",
            ));
        }
        Ok(CallOrderExtensions::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut extensions = CallOrderExtensions::default();
        while let Some(key) = map.next_key::<String>()? {
            if key == TARGET_COLLATERAL_RATIO {
                extensions.target_collateral_ratio = map.next_value::<Option<u16>>()?;
            } else {
                return Err(de::Error::unknown_field(&key, &[TARGET_COLLATERAL_RATIO]));
            }
        }
        Ok(extensions)
    }
}

impl<'de> Deserialize<'de> for CallOrderExtensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CallOrderExtensionsVisitor)
    }
}

/// Operation 3: adjust collateral and debt of a margin position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOrderUpdate {
    pub fee: AssetAmount,
    pub funding_account: AccountId,
    pub delta_collateral: AssetAmount,
    pub delta_debt: AssetAmount,
    #[serde(default)]
    pub extensions: CallOrderExtensions,
}

encode_fields!(CallOrderUpdate {
    fee,
    funding_account,
    delta_collateral,
    delta_debt,
    extensions,
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::AssetId;

    fn call_update(ratio: Option<u16>) -> CallOrderUpdate {
        CallOrderUpdate {
            fee: AssetAmount::core(100),
            funding_account: AccountId::new(11),
            delta_collateral: AssetAmount::new(1, AssetId::new(5650)),
            delta_debt: AssetAmount::new(0, AssetId::new(5662)),
            extensions: CallOrderExtensions {
                target_collateral_ratio: ratio,
            },
        }
    }

    #[test]
    fn test_limit_order_create_body() {
        let op = LimitOrderCreate {
            fee: AssetAmount::core(100),
            seller: AccountId::new(100),
            amount_to_sell: AssetAmount::core(100_000),
            min_to_receive: AssetAmount::new(100_000, AssetId::new(121)),
            expiration: PointInTime::from_secs(1_459_931_367),
            fill_or_kill: false,
            extensions: Extensions,
        };
        assert_eq!(
            hex::encode(op.to_bytes()),
            "64000000000000000064a08601000000000000a08601000000000079e7c804570000"
        );
    }

    #[test]
    fn test_limit_order_accepts_numeric_flag() {
        let json = r#"{
            "fee": {"amount": 100, "asset_id": "1.3.0"},
            "seller": "1.2.100",
            "amount_to_sell": {"amount": 100000, "asset_id": "1.3.0"},
            "min_to_receive": {"amount": 100000, "asset_id": "1.3.121"},
            "expiration": "2016-04-06T08:29:27",
            "fill_or_kill": 1
        }"#;
        let op: LimitOrderCreate = serde_json::from_str(json).unwrap();
        assert!(op.fill_or_kill);
    }

    #[test]
    fn test_limit_order_cancel_body() {
        let op = LimitOrderCancel {
            fee: AssetAmount::core(5),
            fee_paying_account: AccountId::new(100),
            order: LimitOrderId::new(9999),
            extensions: Extensions,
        };
        assert_eq!(hex::encode(op.to_bytes()), "050000000000000000648f4e00");
    }

    #[test]
    fn test_call_order_without_ratio() {
        assert_eq!(
            hex::encode(call_update(None).to_bytes()),
            "6400000000000000000b0100000000000000922c00000000000000009e2c00"
        );
    }

    #[test]
    fn test_call_order_ratio_is_a_static_variant() {
        assert_eq!(
            hex::encode(call_update(Some(2000)).to_bytes()),
            "6400000000000000000b0100000000000000922c00000000000000009e2c0100d007"
        );
    }

    #[test]
    fn test_call_order_zero_ratio() {
        let bytes = call_update(Some(0)).to_bytes();
        assert_eq!(&bytes[bytes.len() - 3..], &[0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_call_order_extension_json() {
        let ext: CallOrderExtensions =
            serde_json::from_str(r#"{"target_collateral_ratio": 2000}"#).unwrap();
        assert_eq!(ext.target_collateral_ratio, Some(2000));
        assert_eq!(
            serde_json::to_string(&ext).unwrap(),
            r#"{"target_collateral_ratio":2000}"#
        );

        let empty: CallOrderExtensions = serde_json::from_str("[]").unwrap();
        assert_eq!(empty, CallOrderExtensions::default());
        assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");

        assert!(serde_json::from_str::<CallOrderExtensions>(r#"{"bogus": 1}"#).is_err());
    }
}
