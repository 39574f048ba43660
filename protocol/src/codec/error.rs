//! Error types for the primitive codec.

use thiserror::Error;

/// Failures raised while encoding or decoding primitive wire values.
///
/// Encoders never truncate. A value that does not fit its field is an error,
/// full stop; a silently wrapped integer would be signed and broadcast
/// before anyone noticed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A negative value was handed to an unsigned field.
    #[error("negative value {value} cannot be encoded as {width}")]
    Negative { value: i64, width: &'static str },

    /// The value exceeds the range of the target field.
    #[error("value {value} overflows {width}")]
    Overflow { value: i128, width: &'static str },

    /// Input ended in the middle of a varint.
    #[error("truncated varint after {read} bytes")]
    TruncatedVarint { read: usize },

    /// A varint longer than the 10 bytes a u64 can ever need.
    #[error("varint exceeds 64 bits")]
    VarintOverflow,

    /// A timestamp string that is not `YYYY-MM-DDTHH:MM:SS`.
    #[error("invalid point in time {0:?}: {1}")]
    InvalidTimestamp(String, String),
}
