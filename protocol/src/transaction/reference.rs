//! Cross-checking local bytes against the node's serializer.
//!
//! Local serialization is never trusted on its own. Before a digest is
//! signed, the unsigned transaction is sent to a node's
//! `get_transaction_hex`, and the reply must equal the local canonical
//! bytes followed by one empty-signature-list byte (`00`). Only a
//! [`VerifiedTransaction`] can be passed to the signer, so an unchecked
//! transaction cannot be signed by construction.

use tracing::{debug, warn};

use super::builder::{digest_bytes, id_from_bytes, Transaction};
use super::error::TransactionError;
use crate::config::ChainParams;
use crate::node::ReferenceSerializer;

/// A transaction whose canonical bytes match the node's reference
/// serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedTransaction {
    tx: Transaction,
    canonical: Vec<u8>,
}

impl VerifiedTransaction {
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    /// The bytes that were checked, cached so that signing hashes exactly
    /// what the node confirmed.
    pub fn canonical_bytes(&self) -> &[u8] {
        &self.canonical
    }

    pub fn digest(&self, chain: &ChainParams) -> [u8; 32] {
        digest_bytes(chain, &self.canonical)
    }

    pub fn id(&self) -> String {
        id_from_bytes(&self.canonical)
    }

    pub fn into_inner(self) -> Transaction {
        self.tx
    }

    pub(crate) fn transaction_mut(&mut self) -> &mut Transaction {
        &mut self.tx
    }
}

/// Compare `tx` with the node's serialization of it.
///
/// The transaction must be unsigned and carry at least one operation. Hex
/// comparison ignores case and surrounding whitespace.
pub fn cross_check<N>(tx: Transaction, node: &N) -> Result<VerifiedTransaction, TransactionError>
where
    N: ReferenceSerializer + ?Sized,
{
    if !tx.signatures.is_empty() {
        return Err(TransactionError::Malformed(
            "transaction is already signed".to_string(),
        ));
    }
    if tx.operations.is_empty() {
        return Err(TransactionError::Malformed(
            "transaction has no operations".to_string(),
        ));
    }

    let canonical = tx.canonical_bytes();
    let mut local = hex::encode(&canonical);
    local.push_str("00");

    let reference = node
        .get_transaction_hex(&tx.to_unsigned_json()?)?
        .trim()
        .to_ascii_lowercase();

    if reference != local {
        let offset = first_difference(&reference, &local);
        warn!(
            offset,
            reference_len = reference.len(),
            local_len = local.len(),
            "local serialization disagrees with node"
        );
        return Err(TransactionError::SerializationMismatch {
            offset,
            reference,
            local,
        });
    }

    debug!(id = %id_from_bytes(&canonical), "serialization cross-check passed");
    Ok(VerifiedTransaction { tx, canonical })
}

fn first_difference(a: &str, b: &str) -> usize {
    a.bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .unwrap_or_else(|| a.len().min(b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::AssetAmount;
    use crate::crypto::CompactSignature;
    use crate::node::NodeError;
    use crate::operations::Transfer;
    use crate::transaction::{TransactionBuilder, TransactionHeader};

    struct FixedHex<'a>(&'a str);

    impl ReferenceSerializer for FixedHex<'_> {
        fn get_transaction_hex(&self, _tx: &serde_json::Value) -> Result<String, NodeError> {
            Ok(self.0.to_string())
        }
    }

    struct Unreachable;

    impl ReferenceSerializer for Unreachable {
        fn get_transaction_hex(&self, _tx: &serde_json::Value) -> Result<String, NodeError> {
            Err(NodeError::Timeout)
        }
    }

    fn transfer_tx() -> Transaction {
        TransactionBuilder::new()
            .header(TransactionHeader {
                ref_block_num: 34294,
                ref_block_prefix: 3707022213,
                expiration: "2016-04-06T08:29:27".parse().unwrap(),
            })
            .operation(Transfer::new(
                AssetAmount::core(264),
                "1.2.100".parse().unwrap(),
                "1.2.200".parse().unwrap(),
                AssetAmount::core(12_345),
            ))
            .build()
            .unwrap()
    }

    const NODE_HEX: &str =
        "f68585abf4dce7c80457010008010000000000000064c80139300000000000000000000000";

    #[test]
    fn test_matching_reference_passes() {
        let verified = cross_check(transfer_tx(), &FixedHex(NODE_HEX)).unwrap();
        assert_eq!(
            hex::encode(verified.canonical_bytes()),
            &NODE_HEX[..NODE_HEX.len() - 2]
        );
        assert_eq!(verified.id(), transfer_tx().id());
    }

    #[test]
    fn test_case_and_whitespace_are_ignored() {
        let upper = format!(" {}\n", NODE_HEX.to_uppercase());
        assert!(cross_check(transfer_tx(), &FixedHex(&upper)).is_ok());
    }

    #[test]
    fn test_mismatch_reports_offset() {
        // Low byte of the transfer amount changed.
        let tampered = "f68585abf4dce7c80457010008010000000000000064c80139310000000000000000000000";
        match cross_check(transfer_tx(), &FixedHex(tampered)) {
            Err(TransactionError::SerializationMismatch { offset, .. }) => assert_eq!(offset, 51),
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_trailing_byte_is_a_mismatch() {
        let short = &NODE_HEX[..NODE_HEX.len() - 2];
        assert!(matches!(
            cross_check(transfer_tx(), &FixedHex(short)),
            Err(TransactionError::SerializationMismatch { .. })
        ));
    }

    #[test]
    fn test_signed_transaction_is_rejected() {
        let mut tx = transfer_tx();
        tx.signatures.push(CompactSignature::from_bytes([0x20; 65]));
        assert!(matches!(
            cross_check(tx, &FixedHex(NODE_HEX)),
            Err(TransactionError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_operations_are_rejected() {
        let mut tx = transfer_tx();
        tx.operations.clear();
        assert!(matches!(
            cross_check(tx, &FixedHex(NODE_HEX)),
            Err(TransactionError::Malformed(_))
        ));
    }

    #[test]
    fn test_node_failure_propagates() {
        assert!(matches!(
            cross_check(transfer_tx(), &Unreachable),
            Err(TransactionError::Node(NodeError::Timeout))
        ));
    }
}
