//! # Chain Object Types
//!
//! The nouns every operation is built from: object references, asset
//! amounts and prices, asset options and memos. Each type knows its own wire
//! encoding and its JSON shape as the node speaks it.

pub mod asset;
pub mod extensions;
pub(crate) mod lenient;
pub mod memo;
pub mod object_id;

pub use asset::{AssetAmount, AssetOptions, BitAssetOptions, Price, PriceFeed};
pub use extensions::Extensions;
pub use memo::{deserialize_optional_memo, Memo, MemoMessage};
pub use object_id::{AccountId, AssetId, LimitOrderId, ObjectId, ObjectIdError, PoolId};
