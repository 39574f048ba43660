//! Liquidity pools: create (59), delete (60), deposit (61), exchange (63)
//! and update (75).

use serde::{Deserialize, Serialize};

use crate::chain::{AccountId, AssetAmount, AssetId, Extensions, PoolId};
use crate::codec::encode_fields;

/// Operation 59: open a pool between two assets, backed by a share asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPoolCreate {
    pub fee: AssetAmount,
    pub account: AccountId,
    pub asset_a: AssetId,
    pub asset_b: AssetId,
    pub share_asset: AssetId,
    pub taker_fee_percent: u16,
    pub withdrawal_fee_percent: u16,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(LiquidityPoolCreate {
    fee,
    account,
    asset_a,
    asset_b,
    share_asset,
    taker_fee_percent,
    withdrawal_fee_percent,
    extensions,
});

/// Operation 60: close an empty pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPoolDelete {
    pub fee: AssetAmount,
    pub account: AccountId,
    pub pool: PoolId,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(LiquidityPoolDelete {
    fee,
    account,
    pool,
    extensions
});

/// Operation 61: add both assets to a pool in exchange for shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPoolDeposit {
    pub fee: AssetAmount,
    pub account: AccountId,
    pub pool: PoolId,
    pub amount_a: AssetAmount,
    pub amount_b: AssetAmount,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(LiquidityPoolDeposit {
    fee,
    account,
    pool,
    amount_a,
    amount_b,
    extensions,
});

/// Operation 63: swap against a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPoolExchange {
    pub fee: AssetAmount,
    pub account: AccountId,
    pub pool: PoolId,
    pub amount_to_sell: AssetAmount,
    pub min_to_receive: AssetAmount,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(LiquidityPoolExchange {
    fee,
    account,
    pool,
    amount_to_sell,
    min_to_receive,
    extensions,
});

/// Operation 75: change a pool's fees. Unset fields are left as they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPoolUpdate {
    pub fee: AssetAmount,
    pub account: AccountId,
    pub pool: PoolId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taker_fee_percent: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawal_fee_percent: Option<u16>,
    #[serde(default)]
    pub extensions: Extensions,
}

encode_fields!(LiquidityPoolUpdate {
    fee,
    account,
    pool,
    taker_fee_percent,
    withdrawal_fee_percent,
    extensions,
});
