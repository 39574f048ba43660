//! Checking the signatures attached to a transaction.
//!
//! Every signature is recovered against the transaction digest and compared
//! with a set of expected signer keys. One bad signature does not hide the
//! others: the result has one [`SignatureCheck`] per attached signature, in
//! order, so callers can report exactly which entry failed.

use tracing::{debug, warn};

use super::builder::Transaction;
use crate::config::ChainParams;
use crate::crypto::{recover, CompactSignature, PublicKey, SignatureError};

/// Outcome for a single signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureStatus {
    /// Recovered to one of the expected keys.
    Valid { signer: PublicKey },
    /// Recovered fine, but to a key nobody asked for.
    UnexpectedSigner { recovered: PublicKey },
    /// `r`/`s` fail the canonical-form rule; the network would reject it.
    NonCanonical,
    /// Header or body could not be turned back into a public key.
    Unrecoverable(SignatureError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCheck {
    pub index: usize,
    pub status: SignatureStatus,
}

impl SignatureCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self.status, SignatureStatus::Valid { .. })
    }
}

/// Check every signature on `tx` against `expected`.
pub fn verify_transaction(
    tx: &Transaction,
    chain: &ChainParams,
    expected: &[PublicKey],
) -> Vec<SignatureCheck> {
    let digest = tx.digest(chain);
    let checks: Vec<SignatureCheck> = tx
        .signatures
        .iter()
        .enumerate()
        .map(|(index, sig)| SignatureCheck {
            index,
            status: check_one(sig, &digest, expected),
        })
        .collect();

    let valid = checks.iter().filter(|c| c.is_valid()).count();
    if valid == checks.len() {
        debug!(signatures = checks.len(), "all signatures valid");
    } else {
        warn!(valid, total = checks.len(), "transaction has invalid signatures");
    }
    checks
}

/// True when the transaction carries at least one signature and all of them
/// recover to expected keys.
pub fn is_fully_signed(tx: &Transaction, chain: &ChainParams, expected: &[PublicKey]) -> bool {
    let checks = verify_transaction(tx, chain, expected);
    !checks.is_empty() && checks.iter().all(SignatureCheck::is_valid)
}

/// Recover the signer of each attached signature.
pub fn recover_signers(
    tx: &Transaction,
    chain: &ChainParams,
) -> Result<Vec<PublicKey>, SignatureError> {
    let digest = tx.digest(chain);
    tx.signatures.iter().map(|sig| recover(sig, &digest)).collect()
}

fn check_one(sig: &CompactSignature, digest: &[u8; 32], expected: &[PublicKey]) -> SignatureStatus {
    if !sig.is_canonical() {
        return SignatureStatus::NonCanonical;
    }
    match recover(sig, digest) {
        Ok(key) if expected.contains(&key) => SignatureStatus::Valid { signer: key },
        Ok(key) => SignatureStatus::UnexpectedSigner { recovered: key },
        Err(e) => SignatureStatus::Unrecoverable(e),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
