//! # LEB128 Varints
//!
//! Unsigned base-128 integers, low seven bits first, continuation bit on
//! every byte but the last. The ledger uses them for every length prefix,
//! every object instance and every operation tag, so they show up
//! constantly in a serialized transaction.

use super::error::CodecError;
use super::Encode;

/// Maximum encoded length of a u64.
pub const MAX_VARINT_LEN: usize = 10;

/// Append the varint encoding of `value` to `out`.
///
/// The encoding is minimal: zero is a single `0x00` byte and there are never
/// trailing continuation bytes.
pub fn write_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Encode `value` into a fresh buffer.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);
    write_varint(value, &mut out);
    out
}

/// Decode a varint from the front of `input`.
///
/// Returns the value and the number of bytes consumed. Trailing input is left
/// alone so callers can walk a buffer field by field.
pub fn decode_varint(input: &[u8]) -> Result<(u64, usize), CodecError> {
    let mut value: u64 = 0;
    for (index, byte) in input.iter().enumerate() {
        if index >= MAX_VARINT_LEN {
            return Err(CodecError::VarintOverflow);
        }
        let payload = u64::from(byte & 0x7f);
        let shift = 7 * index as u32;
        // The tenth byte may only contribute the single top bit.
        if index == MAX_VARINT_LEN - 1 && payload > 1 {
            return Err(CodecError::VarintOverflow);
        }
        value |= payload << shift;
        if byte & 0x80 == 0 {
            return Ok((value, index + 1));
        }
    }
    Err(CodecError::TruncatedVarint { read: input.len() })
}

/// A value that goes on the wire as a varint rather than a fixed-width int.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Varint(pub u64);

impl Encode for Varint {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.0, out);
    }
}

impl From<u64> for Varint {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<usize> for Varint {
    fn from(value: usize) -> Self {
        Self(value as u64)
    }
}
