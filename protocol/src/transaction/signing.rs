//! Transaction signing with secp256k1 WIF keys.
//!
//! Signing is a separate step from building because the key is usually
//! supplied late (prompted, read from a keystore, or passed on the command
//! line). The signed value is `sha256(chain_id ++ canonical_bytes)` over the
//! bytes the node confirmed during the cross-check, so the chain id binds
//! each signature to one network.

use tracing::{debug, info};

use super::builder::Transaction;
use super::error::TransactionError;
use super::reference::VerifiedTransaction;
use crate::config::ChainParams;
use crate::crypto::{sign_digest, PrivateKey};

/// Sign a cross-checked transaction in place and return it.
///
/// The WIF is decoded first; a bad key is reported as
/// [`TransactionError::NoSignature`] and leaves the transaction untouched.
/// The resulting compact signature is canonical and appended to
/// `signatures`.
///
/// # Example
///
/// ```rust,no_run
/// use graphene_signing::config::ChainParams;
/// use graphene_signing::transaction::{cross_check, sign_transaction, Transaction};
/// # struct Node;
/// # impl graphene_signing::node::ReferenceSerializer for Node {
/// #     fn get_transaction_hex(&self, _: &serde_json::Value) -> Result<String, graphene_signing::node::NodeError> { unimplemented!() }
/// # }
/// # fn node() -> impl graphene_signing::node::ReferenceSerializer { Node }
/// # fn tx() -> Transaction { unimplemented!() }
///
/// let mut verified = cross_check(tx(), &node()).unwrap();
/// let signed = sign_transaction(
///     &mut verified,
///     &ChainParams::mainnet(),
///     "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ",
/// )
/// .unwrap();
/// assert_eq!(signed.signatures.len(), 1);
/// ```
pub fn sign_transaction<'a>(
    tx: &'a mut VerifiedTransaction,
    chain: &ChainParams,
    wif: &str,
) -> Result<&'a Transaction, TransactionError> {
    sign_transaction_multi(tx, chain, &[wif])
}

/// Sign with several keys. Every WIF is decoded before any signature is
/// added, so a bad key in the list leaves the transaction unchanged.
pub fn sign_transaction_multi<'a>(
    tx: &'a mut VerifiedTransaction,
    chain: &ChainParams,
    wifs: &[&str],
) -> Result<&'a Transaction, TransactionError> {
    let keys = wifs
        .iter()
        .map(|wif| PrivateKey::from_wif(wif))
        .collect::<Result<Vec<_>, _>>()
        .map_err(TransactionError::NoSignature)?;

    let digest = tx.digest(chain);
    debug!(digest = %hex::encode(digest), keys = keys.len(), "signing transaction");

    let signatures = keys
        .iter()
        .map(|key| sign_digest(key, &digest))
        .collect::<Result<Vec<_>, _>>()?;

    let id = tx.id();
    let inner = tx.transaction_mut();
    inner.signatures.extend(signatures);
    info!(%id, signatures = inner.signatures.len(), "transaction signed");
    Ok(inner)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
