//! # Primitive Codec
//!
//! The ledger's wire format is not self-describing: there are no field tags,
//! no lengths on fixed-width values and no padding. A transaction is simply
//! every field of every operation written back to back in schema order. Get
//! one byte wrong and the node computes a different digest, which means the
//! signature we attach authenticates something nobody intended.
//!
//! This module provides the building blocks:
//!
//! - **Fixed-width integers**: little-endian, sized per field.
//! - **Varints**: LEB128, for lengths, object instances and tags.
//! - **Arrays and strings**: varint length followed by the elements.
//! - **Optionals**: a presence byte, with a legacy quirk (see [`Encode`] for
//!   `Option<T>`).
//! - **Points in time**: UTC seconds since the epoch as a `u32`.
//! - **Static variants**: `varint(tag) ++ payload`.
//!
//! Everything implements [`Encode`], which appends to a caller-owned buffer so
//! a whole transaction serializes into one allocation.

/// Implement [`Encode`] for a struct by writing the listed fields in order.
///
/// The field list *is* the wire schema, so it is spelled out at every use
/// site rather than derived from declaration order.
macro_rules! encode_fields {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::codec::Encode for $ty {
            fn encode(&self, out: &mut Vec<u8>) {
                $( $crate::codec::Encode::encode(&self.$field, out); )+
            }
        }
    };
}

pub(crate) use encode_fields;

pub mod error;
pub mod time;
pub mod types;
pub mod varint;

pub use error::CodecError;
pub use time::PointInTime;
pub use types::{checked_u16, checked_u32, checked_u8, escape_string, StaticVariant};
pub use varint::{decode_varint, encode_varint, write_varint, Varint};

/// A value with a fixed binary encoding on the ledger's wire.
pub trait Encode {
    /// Append this value's encoding to `out`.
    fn encode(&self, out: &mut Vec<u8>);

    /// Encode into a fresh buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, out: &mut Vec<u8>) {
        (**self).encode(out);
    }
}
