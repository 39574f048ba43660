//! # Transaction Module
//!
//! Assembly, node cross-check, signing and verification of ledger
//! transactions.
//!
//! ## Architecture
//!
//! ```text
//! builder.rs      - TransactionHeader, Transaction and the canonical byte buffer
//! reference.rs    - cross_check against the node serializer, VerifiedTransaction
//! signing.rs      - deterministic canonical signing with WIF keys
//! verification.rs - per-signature recovery and signer checks
//! error.rs        - TransactionError and its coarse categories
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build** with [`TransactionBuilder`], usually after deriving a
//!    [`TransactionHeader`] from the node's dynamic global properties.
//! 2. **Cross-check** with [`cross_check`]; the node's hex must equal the
//!    local bytes plus `00`.
//! 3. **Sign** the resulting [`VerifiedTransaction`] with [`sign_transaction`].
//! 4. **Verify** with [`verify_transaction`] before broadcasting, if the
//!    expected signers are known.
//!
//! Transaction ids are the first 20 bytes of `sha256(canonical_bytes)`; the
//! signed digest additionally prefixes the 32-byte chain id.

pub mod builder;
pub mod error;
pub mod reference;
pub mod signing;
pub mod verification;

pub use builder::{Transaction, TransactionBuilder, TransactionHeader, TRANSACTION_ID_LENGTH};
pub use error::{ErrorCategory, TransactionError};
pub use reference::{cross_check, VerifiedTransaction};
pub use signing::{sign_transaction, sign_transaction_multi};
pub use verification::{
    is_fully_signed, recover_signers, verify_transaction, SignatureCheck, SignatureStatus,
};
