//! # Amounts, Prices and Asset Options
//!
//! Amounts are raw integers in the asset's smallest unit. Nothing here
//! scales decimals: converting "1.5 BTS" into `150000` is the caller's job,
//! done before a value ever reaches the encoder.

use serde::{Deserialize, Serialize};

use super::extensions::Extensions;
use super::lenient::int_or_string;
use super::object_id::{AccountId, AssetId};
use crate::codec::encode_fields;

/// A signed 64-bit amount of a specific asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
    #[serde(deserialize_with = "int_or_string")]
    pub amount: i64,
    pub asset_id: AssetId,
}

impl AssetAmount {
    pub fn new(amount: i64, asset_id: AssetId) -> Self {
        Self { amount, asset_id }
    }

    /// An amount of the core asset, which is what every fee is paid in.
    pub fn core(amount: i64) -> Self {
        Self::new(amount, AssetId::CORE)
    }
}

encode_fields!(AssetAmount { amount, asset_id });

/// A price expressed as a ratio of two amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub base: AssetAmount,
    pub quote: AssetAmount,
}

encode_fields!(Price { base, quote });

/// A feed producer's view of a market-pegged asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFeed {
    pub settlement_price: Price,
    pub maintenance_collateral_ratio: u16,
    pub maximum_short_squeeze_ratio: u16,
    pub core_exchange_rate: Price,
}

encode_fields!(PriceFeed {
    settlement_price,
    maintenance_collateral_ratio,
    maximum_short_squeeze_ratio,
    core_exchange_rate,
});

/// Options common to every asset.
///
/// The authority and market lists are written in the order given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetOptions {
    #[serde(deserialize_with = "int_or_string")]
    pub max_supply: i64,
    pub market_fee_percent: u16,
    #[serde(deserialize_with = "int_or_string")]
    pub max_market_fee: i64,
    pub issuer_permissions: u16,
    pub flags: u16,
    pub core_exchange_rate: Price,
    pub whitelist_authorities: Vec<AccountId>,
    pub blacklist_authorities: Vec<AccountId>,
    pub whitelist_markets: Vec<AssetId>,
    pub blacklist_markets: Vec<AssetId>,
    pub description: String,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(AssetOptions {
    max_supply,
    market_fee_percent,
    max_market_fee,
    issuer_permissions,
    flags,
    core_exchange_rate,
    whitelist_authorities,
    blacklist_authorities,
    whitelist_markets,
    blacklist_markets,
    description,
    extensions,
});

/// Extra options for market-pegged (bit)assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitAssetOptions {
    pub feed_lifetime_sec: u32,
    pub minimum_feeds: u8,
    pub force_settlement_delay_sec: u32,
    pub force_settlement_offset_percent: u16,
    pub maximum_force_settlement_volume: u16,
    pub short_backing_asset: AssetId,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(BitAssetOptions {
    feed_lifetime_sec,
    minimum_feeds,
    force_settlement_delay_sec,
    force_settlement_offset_percent,
    maximum_force_settlement_volume,
    short_backing_asset,
    extensions,
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Encode;

    #[test]
    fn test_asset_amount_encoding() {
        let fee = AssetAmount::core(264);
        assert_eq!(hex::encode(fee.to_bytes()), "080100000000000000");
        let amount = AssetAmount::new(-1, AssetId::new(130));
        assert_eq!(hex::encode(amount.to_bytes()), "ffffffffffffffff8201");
    }

    #[test]
    fn test_asset_amount_accepts_string_amount() {
        let parsed: AssetAmount =
            serde_json::from_str(r#"{"amount":"12345","asset_id":"1.3.0"}"#).unwrap();
        assert_eq!(parsed, AssetAmount::core(12_345));
        assert!(serde_json::from_str::<AssetAmount>(r#"{"amount":1,"asset_id":"1.2.0"}"#).is_err());
    }

    #[test]
    fn test_price_feed_field_order() {
        let feed = PriceFeed {
            settlement_price: Price {
                base: AssetAmount::new(1, AssetId::new(1)),
                quote: AssetAmount::core(2),
            },
            maintenance_collateral_ratio: 1750,
            maximum_short_squeeze_ratio: 1100,
            core_exchange_rate: Price {
                base: AssetAmount::new(3, AssetId::new(1)),
                quote: AssetAmount::core(4),
            },
        };
        let expected = concat!(
            "010000000000000001",
            "020000000000000000",
            "d606",
            "4c04",
            "030000000000000001",
            "040000000000000000",
        );
        assert_eq!(hex::encode(feed.to_bytes()), expected);
    }

    #[test]
    fn test_asset_options_encoding() {
        let json = r#"{
            "max_supply": "1000000000000000",
            "market_fee_percent": 0,
            "max_market_fee": 0,
            "issuer_permissions": 0,
            "flags": 0,
            "core_exchange_rate": {
                "base": {"amount": 1, "asset_id": "1.3.0"},
                "quote": {"amount": 1, "asset_id": "1.3.1"}
            },
            "whitelist_authorities": [],
            "blacklist_authorities": [],
            "whitelist_markets": [],
            "blacklist_markets": [],
            "description": ""
        }"#;
        let options: AssetOptions = serde_json::from_str(json).unwrap();
        assert!(options.whitelist_authorities.is_empty());
        let bytes = options.to_bytes();
        // Four empty lists, an empty description and empty extensions close it.
        assert_eq!(&bytes[bytes.len() - 6..], &[0, 0, 0, 0, 0, 0]);
        assert_eq!(&bytes[..8], &1_000_000_000_000_000i64.to_le_bytes());
    }

    #[test]
    fn test_asset_options_lists_and_description_are_required() {
        let value = serde_json::json!({
            "max_supply": 1000,
            "market_fee_percent": 0,
            "max_market_fee": 0,
            "issuer_permissions": 0,
            "flags": 0,
            "core_exchange_rate": {
                "base": {"amount": 1, "asset_id": "1.3.0"},
                "quote": {"amount": 1, "asset_id": "1.3.1"}
            },
            "whitelist_authorities": [],
            "blacklist_authorities": [],
            "whitelist_markets": [],
            "blacklist_markets": [],
            "description": ""
        });
        // `extensions` is absent and defaults to empty.
        assert!(serde_json::from_value::<AssetOptions>(value.clone()).is_ok());
        for field in [
            "whitelist_authorities",
            "blacklist_authorities",
            "whitelist_markets",
            "blacklist_markets",
            "description",
        ] {
            let mut partial = value.clone();
            partial.as_object_mut().unwrap().remove(field);
            let err = serde_json::from_value::<AssetOptions>(partial).unwrap_err();
            assert!(err.to_string().contains(field), "{field}: {err}");
        }
    }
}
