//! Operation 0: move funds between accounts.

use serde::{Deserialize, Serialize};

use crate::chain::{deserialize_optional_memo, AccountId, AssetAmount, Extensions, Memo};
use crate::codec::encode_fields;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub fee: AssetAmount,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: AssetAmount,
    /// Left out of the JSON entirely when absent; the node's reference
    /// serializer disagrees with us otherwise.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_memo"
    )]
    pub memo: Option<Memo>,
    #[serde(default)]
    pub extensions: Extensions,
}

impl Transfer {
    pub fn new(fee: AssetAmount, from: AccountId, to: AccountId, amount: AssetAmount) -> Self {
        Self {
            fee,
            from,
            to,
            amount,
            memo: None,
            extensions: Extensions,
        }
    }

    /// Attach a memo. Empty memos are dropped.
    pub fn with_memo(mut self, memo: Memo) -> Self {
        self.memo = memo.non_empty();
        self
    }
}

encode_fields!(Transfer {
    fee,
    from,
    to,
    amount,
    memo,
    extensions
});
