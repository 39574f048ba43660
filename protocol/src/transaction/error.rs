//! Error types for transaction assembly, cross-checking and signing.

use thiserror::Error;

use crate::chain::AccountId;
use crate::codec::CodecError;
use crate::crypto::{KeyError, SignatureError};
use crate::node::NodeError;
use crate::operations::OperationError;

/// Broad classes of failure, so an orchestration layer can decide whether to
/// fix the input, give up on this transaction, or try another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad shapes, bad ids, unknown operations. Fix the input.
    MalformedInput,
    /// A checksum or the node cross-check disagreed. Do not sign.
    ChecksumOrEncoding,
    /// Key parsing or signing failed. No signature was attached.
    Cryptographic,
    /// The node could not be reached or answered nonsense.
    ExternalCollaborator,
}

/// Errors that can occur while building, verifying or signing a transaction.
///
/// None of these leave a partially signed transaction behind: signatures are
/// only ever appended once a complete, verified signature exists.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Structurally unusable input (no header, no operations, already signed...).
    #[error("malformed transaction: {0}")]
    Malformed(String),

    /// More operations than the configured cap. Never truncated.
    #[error("too many operations: {count} exceeds the limit of {max}")]
    TooManyOperations { count: usize, max: usize },

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Our bytes and the node's reference bytes differ.
    #[error("serialization mismatch at hex offset {offset}: node and local encodings differ")]
    SerializationMismatch {
        offset: usize,
        reference: String,
        local: String,
    },

    /// The signing key could not be parsed; nothing was signed.
    #[error("no signature produced: {0}")]
    NoSignature(#[source] KeyError),

    #[error("signing failed: {0}")]
    Signature(#[from] SignatureError),

    /// Key material that failed to parse outside of a signing attempt.
    #[error("invalid key: {0}")]
    Key(#[from] KeyError),

    /// The key is valid but the node does not list it for the account.
    #[error("key {address} is not authorized for account {account}")]
    NotAuthorized { account: AccountId, address: String },

    #[error("node query failed: {0}")]
    Node(#[from] NodeError),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransactionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TransactionError::Malformed(_)
            | TransactionError::TooManyOperations { .. }
            | TransactionError::Operation(_)
            | TransactionError::Codec(_)
            | TransactionError::Json(_) => ErrorCategory::MalformedInput,
            TransactionError::SerializationMismatch { .. } => ErrorCategory::ChecksumOrEncoding,
            TransactionError::NoSignature(KeyError::ChecksumMismatch)
            | TransactionError::Key(KeyError::ChecksumMismatch) => ErrorCategory::ChecksumOrEncoding,
            TransactionError::NoSignature(_)
            | TransactionError::Key(_)
            | TransactionError::Signature(_)
            | TransactionError::NotAuthorized { .. } => ErrorCategory::Cryptographic,
            TransactionError::Node(_) => ErrorCategory::ExternalCollaborator,
        }
    }
}
