//! Transaction assembly and the canonical byte buffer.
//!
//! The [`TransactionBuilder`] collects a header and an ordered list of
//! operations and refuses to produce anything oversized or empty. The
//! resulting [`Transaction`] knows how to lay itself out on the wire:
//!
//! ```text
//! ref_block_num      u16 LE
//! ref_block_prefix   u32 LE
//! expiration         u32 LE (epoch seconds)
//! operations         varint(n) ++ n * (varint(code) ++ fields)
//! extensions         varint(0)
//! signatures         varint(m) ++ m * 65 bytes   (signed form only)
//! ```
//!
//! The builder does not sign, and it does not trust itself either: bytes
//! only become signable after [`super::cross_check`] has compared them with
//! the node's own serialization.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::TransactionError;
use crate::chain::Extensions;
use crate::codec::{write_varint, Encode, PointInTime};
use crate::config::{ChainParams, DEFAULT_MAX_OPERATIONS};
use crate::crypto::hash::{sha256, sha256_multi};
use crate::crypto::CompactSignature;
use crate::node::DynamicGlobalProperties;
use crate::operations::Operation;

/// Length of a transaction id in bytes (a truncated SHA-256).
pub const TRANSACTION_ID_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// TaPoS reference plus expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub expiration: PointInTime,
}

impl TransactionHeader {
    /// Derive the block reference from the node's dynamic global properties.
    ///
    /// `ref_block_num` is the low 16 bits of the head block number and
    /// `ref_block_prefix` is bytes 4..8 of the head block id, little-endian.
    /// The transaction expires `expiration_secs` after the head block time.
    pub fn from_dynamic_global_properties(
        props: &DynamicGlobalProperties,
        expiration_secs: u32,
    ) -> Result<Self, TransactionError> {
        let expiration = props.time.checked_add_secs(expiration_secs)?;
        let block_id = hex::decode(&props.head_block_id).map_err(|e| {
            TransactionError::Malformed(format!("head_block_id is not hex: {e}"))
        })?;
        let prefix_bytes: [u8; 4] = block_id
            .get(4..8)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| {
                TransactionError::Malformed(format!(
                    "head_block_id too short: {} bytes",
                    block_id.len()
                ))
            })?;
        Ok(Self {
            ref_block_num: (props.head_block_number & 0xffff) as u16,
            ref_block_prefix: u32::from_le_bytes(prefix_bytes),
            expiration,
        })
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A ledger transaction, in the JSON shape the node speaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub expiration: PointInTime,
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub extensions: Extensions,
    /// Compact signatures, appended by [`super::sign_transaction`].
    #[serde(default)]
    pub signatures: Vec<CompactSignature>,
}

impl Transaction {
    pub fn header(&self) -> TransactionHeader {
        TransactionHeader {
            ref_block_num: self.ref_block_num,
            ref_block_prefix: self.ref_block_prefix,
            expiration: self.expiration,
        }
    }

    /// The canonical bytes that get hashed and signed. Signatures are never
    /// part of them.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64 + 64 * self.operations.len());
        self.ref_block_num.encode(&mut buf);
        self.ref_block_prefix.encode(&mut buf);
        self.expiration.encode(&mut buf);

        write_varint(self.operations.len() as u64, &mut buf);
        for op in &self.operations {
            op.encode(&mut buf);
            // Call-order updates carry one extra empty varint after their
            // extension block; the node's serializer expects it.
            if let Operation::CallOrderUpdate(_) = op {
                write_varint(0, &mut buf);
            }
        }

        self.extensions.encode(&mut buf);
        debug!(
            operations = self.operations.len(),
            bytes = buf.len(),
            "serialized transaction"
        );
        buf
    }

    /// Hex of the canonical bytes followed by an empty signature list; what
    /// the node's `get_transaction_hex` returns for an unsigned transaction.
    pub fn unsigned_hex(&self) -> String {
        let mut buf = self.canonical_bytes();
        write_varint(0, &mut buf);
        hex::encode(buf)
    }

    /// `sha256(chain_id ++ canonical_bytes)`, the value that is signed.
    pub fn digest(&self, chain: &ChainParams) -> [u8; 32] {
        digest_bytes(chain, &self.canonical_bytes())
    }

    /// Transaction id: the first 20 bytes of `sha256(canonical_bytes)`, hex.
    pub fn id(&self) -> String {
        id_from_bytes(&self.canonical_bytes())
    }

    /// Full wire form including signatures, as broadcast.
    pub fn to_signed_bytes(&self) -> Vec<u8> {
        let mut buf = self.canonical_bytes();
        self.signatures.encode(&mut buf);
        buf
    }

    /// JSON form, signatures included, as broadcast.
    pub fn to_json(&self) -> Result<serde_json::Value, TransactionError> {
        Ok(serde_json::to_value(self)?)
    }

    /// JSON form with the signature list emptied, as sent to the node for
    /// its reference serialization.
    pub fn to_unsigned_json(&self) -> Result<serde_json::Value, TransactionError> {
        let mut value = self.to_json()?;
        value["signatures"] = serde_json::Value::Array(Vec::new());
        Ok(value)
    }

    /// Check the structural rules a transaction must meet before anything is
    /// derived from it.
    pub fn validate(&self, max_operations: usize) -> Result<(), TransactionError> {
        if self.operations.is_empty() {
            return Err(TransactionError::Malformed(
                "transaction has no operations".to_string(),
            ));
        }
        if self.operations.len() > max_operations {
            return Err(TransactionError::TooManyOperations {
                count: self.operations.len(),
                max: max_operations,
            });
        }
        Ok(())
    }
}

pub(crate) fn digest_bytes(chain: &ChainParams, canonical: &[u8]) -> [u8; 32] {
    sha256_multi(&[&chain.chain_id, canonical])
}

pub(crate) fn id_from_bytes(canonical: &[u8]) -> String {
    hex::encode(&sha256(canonical)[..TRANSACTION_ID_LENGTH])
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned transactions.
///
/// # Example
///
/// ```
/// use graphene_signing::chain::AssetAmount;
/// use graphene_signing::codec::PointInTime;
/// use graphene_signing::operations::Transfer;
/// use graphene_signing::transaction::{TransactionBuilder, TransactionHeader};
///
/// let tx = TransactionBuilder::new()
///     .header(TransactionHeader {
///         ref_block_num: 34294,
///         ref_block_prefix: 3707022213,
///         expiration: "2016-04-06T08:29:27".parse().unwrap(),
///     })
///     .operation(Transfer::new(
///         AssetAmount::core(264),
///         "1.2.100".parse().unwrap(),
///         "1.2.200".parse().unwrap(),
///         AssetAmount::core(12345),
///     ))
///     .build()
///     .unwrap();
/// assert_eq!(tx.operations.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    header: Option<TransactionHeader>,
    operations: Vec<Operation>,
    max_operations: usize,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self {
            header: None,
            operations: Vec::new(),
            max_operations: DEFAULT_MAX_OPERATIONS,
        }
    }

    /// Override the operation cap.
    pub fn max_operations(mut self, max: usize) -> Self {
        self.max_operations = max;
        self
    }

    pub fn header(mut self, header: TransactionHeader) -> Self {
        self.header = Some(header);
        self
    }

    /// Append one operation. Order is preserved.
    pub fn operation(mut self, op: impl Into<Operation>) -> Self {
        self.operations.push(op.into());
        self
    }

    pub fn operations(mut self, ops: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(ops);
        self
    }

    /// Finish. Fails without a header, without operations, or with more
    /// operations than the cap allows.
    pub fn build(self) -> Result<Transaction, TransactionError> {
        let header = self
            .header
            .ok_or_else(|| TransactionError::Malformed("missing header".to_string()))?;
        let tx = Transaction {
            ref_block_num: header.ref_block_num,
            ref_block_prefix: header.ref_block_prefix,
            expiration: header.expiration,
            operations: self.operations,
            extensions: Extensions,
            signatures: Vec::new(),
        };
        tx.validate(self.max_operations)?;
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{AccountId, AssetAmount, AssetId};
    use crate::operations::{CallOrderExtensions, CallOrderUpdate, Transfer};

    const TRANSFER_HEX: &str =
        "f68585abf4dce7c80457010008010000000000000064c801393000000000000000000000";

    fn header() -> TransactionHeader {
        TransactionHeader {
            ref_block_num: 34294,
            ref_block_prefix: 3707022213,
            expiration: "2016-04-06T08:29:27".parse().unwrap(),
        }
    }

    fn transfer() -> Transfer {
        Transfer::new(
            AssetAmount::core(264),
            "1.2.100".parse().unwrap(),
            "1.2.200".parse().unwrap(),
            AssetAmount::core(12_345),
        )
    }

    #[test]
    fn test_transfer_matches_reference_fixture() {
        let tx = TransactionBuilder::new()
            .header(header())
            .operation(transfer())
            .build()
            .unwrap();
        assert_eq!(hex::encode(tx.canonical_bytes()), TRANSFER_HEX);
        assert_eq!(tx.unsigned_hex(), format!("{TRANSFER_HEX}00"));
    }

    #[test]
    fn test_call_order_gets_trailing_varint() {
        let op = CallOrderUpdate {
            fee: AssetAmount::core(100),
            funding_account: AccountId::new(11),
            delta_collateral: AssetAmount::new(1, AssetId::new(5650)),
            delta_debt: AssetAmount::new(0, AssetId::new(5662)),
            extensions: CallOrderExtensions::default(),
        };
        let body = op.to_bytes();
        let tx = TransactionBuilder::new()
            .header(header())
            .operation(op)
            .build()
            .unwrap();
        let bytes = tx.canonical_bytes();
        // header(10) + count(1) + code(1) + body + padding(1) + extensions(1)
        assert_eq!(bytes.len(), 10 + 1 + 1 + body.len() + 1 + 1);
        assert_eq!(&bytes[12..12 + body.len()], body.as_slice());
        assert_eq!(&bytes[bytes.len() - 2..], &[0x00, 0x00]);
    }

    #[test]
    fn test_operation_cap_is_enforced() {
        let result = TransactionBuilder::new()
            .max_operations(2)
            .header(header())
            .operations((0..3).map(|_| Operation::from(transfer())))
            .build();
        assert!(matches!(
            result,
            Err(TransactionError::TooManyOperations { count: 3, max: 2 })
        ));
    }

    #[test]
    fn test_empty_and_headerless_are_rejected() {
        assert!(matches!(
            TransactionBuilder::new().header(header()).build(),
            Err(TransactionError::Malformed(_))
        ));
        assert!(matches!(
            TransactionBuilder::new().operation(transfer()).build(),
            Err(TransactionError::Malformed(_))
        ));
    }

    #[test]
    fn test_operation_order_is_preserved() {
        let first = transfer();
        let mut second = transfer();
        second.to = AccountId::new(300);
        let tx = TransactionBuilder::new()
            .header(header())
            .operation(first.clone())
            .operation(second.clone())
            .build()
            .unwrap();
        assert_eq!(tx.operations[0], Operation::from(first));
        assert_eq!(tx.operations[1], Operation::from(second));
    }

    #[test]
    fn test_digest_is_chain_prefixed_sha256() {
        let tx = TransactionBuilder::new()
            .header(header())
            .operation(transfer())
            .build()
            .unwrap();
        let chain = ChainParams::mainnet();
        let mut message = chain.chain_id.to_vec();
        message.extend_from_slice(&tx.canonical_bytes());
        assert_eq!(tx.digest(&chain), sha256(&message));
        assert_ne!(tx.digest(&chain), tx.digest(&ChainParams::testnet()));
    }

    #[test]
    fn test_id_is_truncated_sha256() {
        let tx = TransactionBuilder::new()
            .header(header())
            .operation(transfer())
            .build()
            .unwrap();
        let id = tx.id();
        assert_eq!(id.len(), 2 * TRANSACTION_ID_LENGTH);
        assert_eq!(id, hex::encode(&sha256(&tx.canonical_bytes())[..20]));
    }

    #[test]
    fn test_header_from_dynamic_global_properties() {
        let props = DynamicGlobalProperties {
            head_block_number: 0x0123_85f6,
            head_block_id: "012385f685abf4dc0000000000000000000000ff".to_string(),
            time: PointInTime::from_secs(1_459_931_247),
        };
        let header = TransactionHeader::from_dynamic_global_properties(&props, 120).unwrap();
        assert_eq!(header.ref_block_num, 34294);
        assert_eq!(header.ref_block_prefix, 3707022213);
        assert_eq!(header.expiration, PointInTime::from_secs(1_459_931_367));
    }

    #[test]
    fn test_header_rejects_short_block_id() {
        let props = DynamicGlobalProperties {
            head_block_number: 1,
            head_block_id: "0102".to_string(),
            time: PointInTime::from_secs(0),
        };
        assert!(TransactionHeader::from_dynamic_global_properties(&props, 60).is_err());
    }

    #[test]
    fn test_json_round_trip_and_unsigned_form() {
        let tx = TransactionBuilder::new()
            .header(header())
            .operation(transfer())
            .build()
            .unwrap();
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["expiration"], "2016-04-06T08:29:27");
        assert_eq!(json["operations"][0][0], 0);
        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
        assert_eq!(tx.to_unsigned_json().unwrap()["signatures"], serde_json::json!([]));
    }

    #[test]
    fn test_signed_bytes_append_signature_list() {
        let mut tx = TransactionBuilder::new()
            .header(header())
            .operation(transfer())
            .build()
            .unwrap();
        assert_eq!(tx.to_signed_bytes(), {
            let mut b = tx.canonical_bytes();
            b.push(0);
            b
        });
        tx.signatures.push(CompactSignature::from_bytes([0x1f; 65]));
        let signed = tx.to_signed_bytes();
        assert_eq!(signed.len(), tx.canonical_bytes().len() + 1 + 65);
        assert_eq!(signed[tx.canonical_bytes().len()], 1);
    }
}
