//! Asset administration: create (10), feed producers (13), issue (14),
//! reserve (15), publish feed (19) and fee-pool claim (47).

use serde::{Deserialize, Deserializer, Serialize};

use crate::chain::lenient::bool_or_int;
use crate::chain::{
    deserialize_optional_memo, AccountId, AssetAmount, AssetId, AssetOptions, BitAssetOptions,
    Extensions, Memo, PriceFeed,
};
use crate::codec::{encode_fields, Encode};

/// Operation 10: register a new asset symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCreate {
    pub fee: AssetAmount,
    pub issuer: AccountId,
    pub symbol: String,
    pub precision: u8,
    pub common_options: AssetOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitasset_opts: Option<BitAssetOptions>,
    #[serde(deserialize_with = "bool_or_int")]
    pub is_prediction_market: bool,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(AssetCreate {
    fee,
    issuer,
    symbol,
    precision,
    common_options,
    bitasset_opts,
    is_prediction_market,
    extensions,
});

/// Operation 13: replace the set of accounts allowed to publish feeds.
///
/// The ledger requires the producer list sorted ascending by instance. The
/// constructor and the deserializer both sort, and encoding sorts again, so
/// no path can put an unsorted list on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUpdateFeedProducers {
    pub fee: AssetAmount,
    pub issuer: AccountId,
    pub asset_to_update: AssetId,
    #[serde(deserialize_with = "sorted_accounts")]
    pub new_feed_producers: Vec<AccountId>,
    #[serde(default)]
    pub extensions: Extensions,
}

impl AssetUpdateFeedProducers {
    pub fn new(
        fee: AssetAmount,
        issuer: AccountId,
        asset_to_update: AssetId,
        mut new_feed_producers: Vec<AccountId>,
    ) -> Self {
        new_feed_producers.sort();
        Self {
            fee,
            issuer,
            asset_to_update,
            new_feed_producers,
            extensions: Extensions,
        }
    }
}

impl Encode for AssetUpdateFeedProducers {
    fn encode(&self, out: &mut Vec<u8>) {
        let mut producers = self.new_feed_producers.clone();
        producers.sort();
        self.fee.encode(out);
        self.issuer.encode(out);
        self.asset_to_update.encode(out);
        producers.encode(out);
        self.extensions.encode(out);
    }
}

fn sorted_accounts<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<AccountId>, D::Error> {
    let mut accounts = Vec::<AccountId>::deserialize(deserializer)?;
    accounts.sort();
    Ok(accounts)
}

/// Operation 14: mint new supply of a user-issued asset to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIssue {
    pub fee: AssetAmount,
    pub issuer: AccountId,
    pub asset_to_issue: AssetAmount,
    pub issue_to_account: AccountId,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_memo"
    )]
    pub memo: Option<Memo>,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(AssetIssue {
    fee,
    issuer,
    asset_to_issue,
    issue_to_account,
    memo,
    extensions,
});

/// Operation 15: burn supply back to the reserve pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReserve {
    pub fee: AssetAmount,
    pub payer: AccountId,
    pub amount_to_reserve: AssetAmount,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(AssetReserve {
    fee,
    payer,
    amount_to_reserve,
    extensions
});

/// Operation 19: publish a price feed for a market-pegged asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPublishFeed {
    pub fee: AssetAmount,
    pub publisher: AccountId,
    pub asset_id: AssetId,
    pub feed: PriceFeed,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(AssetPublishFeed {
    fee,
    publisher,
    asset_id,
    feed,
    extensions
});

/// Operation 47: withdraw core asset from an asset's fee pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetClaimPool {
    pub fee: AssetAmount,
    pub issuer: AccountId,
    pub asset_id: AssetId,
    pub amount_to_claim: AssetAmount,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(AssetClaimPool {
    fee,
    issuer,
    asset_id,
    amount_to_claim,
    extensions
});
