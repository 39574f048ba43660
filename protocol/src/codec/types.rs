//! Encodings for scalars, strings, arrays, optionals and static variants.

use super::error::CodecError;
use super::varint::write_varint;
use super::Encode;

// ---------------------------------------------------------------------------
// Fixed-width integers
// ---------------------------------------------------------------------------

macro_rules! impl_encode_le {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Encode for $ty {
                fn encode(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_encode_le!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Booleans travel as a single `0x00` / `0x01` byte.
impl Encode for bool {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }
}

fn checked_unsigned<T>(value: i64, width: &'static str) -> Result<T, CodecError>
where
    T: TryFrom<i64>,
{
    if value < 0 {
        return Err(CodecError::Negative { value, width });
    }
    T::try_from(value).map_err(|_| CodecError::Overflow {
        value: i128::from(value),
        width,
    })
}

/// Narrow a signed value into a `u8` field, failing on sign or range.
pub fn checked_u8(value: i64) -> Result<u8, CodecError> {
    checked_unsigned(value, "u8")
}

/// Narrow a signed value into a `u16` field, failing on sign or range.
pub fn checked_u16(value: i64) -> Result<u16, CodecError> {
    checked_unsigned(value, "u16")
}

/// Narrow a signed value into a `u32` field, failing on sign or range.
pub fn checked_u32(value: i64) -> Result<u32, CodecError> {
    checked_unsigned(value, "u32")
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// Apply the ledger's legacy control-character escaping.
///
/// Most control characters below `0x20` are replaced by the *literal* text
/// `u00XX` (no backslash). Backspace and form feed collapse to a bare `b` and
/// `f`. Tab, newline and carriage return pass through untouched. It is an odd
/// rule, but it is the rule the node's reference serializer applies, and the
/// length prefix is computed over the escaped bytes.
pub fn escape_string(input: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for ch in input.chars() {
        match ch as u32 {
            0x08 => out.push(b'b'),
            0x0c => out.push(b'f'),
            0x09 | 0x0a | 0x0d => out.push(ch as u8),
            code @ (0x00..=0x07 | 0x0b | 0x0e..=0x1f) => {
                out.extend_from_slice(format!("u{code:04x}").as_bytes());
            }
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    out
}

impl Encode for str {
    fn encode(&self, out: &mut Vec<u8>) {
        let escaped = escape_string(self);
        write_varint(escaped.len() as u64, out);
        out.extend_from_slice(&escaped);
    }
}

impl Encode for String {
    fn encode(&self, out: &mut Vec<u8>) {
        self.as_str().encode(out);
    }
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

/// Length-prefixed array. Elements are written in list order; callers that
/// need a sorted set sort before encoding.
impl<T: Encode> Encode for [T] {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.len() as u64, out);
        for item in self {
            item.encode(out);
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        self.as_slice().encode(out);
    }
}

// ---------------------------------------------------------------------------
// Optionals
// ---------------------------------------------------------------------------

/// Optional field.
///
/// `None` is a single zero byte. `Some(v)` is `0x01` followed by `v`, except
/// when `v` itself encodes to nothing, in which case it degrades to the
/// `None` encoding. The reference serializer behaves this way, so we do too.
impl<T: Encode> Encode for Option<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        let inner = match self {
            Some(value) => value.to_bytes(),
            None => Vec::new(),
        };
        if inner.is_empty() {
            out.push(0);
        } else {
            out.push(1);
            out.extend_from_slice(&inner);
        }
    }
}

// ---------------------------------------------------------------------------
// Static variants
// ---------------------------------------------------------------------------

/// A tagged choice: `varint(tag) ++ payload`.
///
/// Used for extension entries, where the tag is the index of the extension
/// in the field's sorted option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticVariant<T> {
    pub tag: u64,
    pub value: T,
}

impl<T> StaticVariant<T> {
    pub fn new(tag: u64, value: T) -> Self {
        Self { tag, value }
    }
}

impl<T: Encode> Encode for StaticVariant<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.tag, out);
        self.value.encode(out);
    }
}

/// A field that encodes to nothing at all. Mostly useful to exercise the
/// optional quirk.
impl Encode for () {
    fn encode(&self, _out: &mut Vec<u8>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_little_endian() {
        assert_eq!(34294u16.to_bytes(), vec![0xf6, 0x85]);
        assert_eq!(3707022213u32.to_bytes(), vec![0x85, 0xab, 0xf4, 0xdc]);
        assert_eq!(264i64.to_bytes(), vec![0x08, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!((-1i64).to_bytes(), vec![0xff; 8]);
        assert_eq!(true.to_bytes(), vec![0x01]);
        assert_eq!(false.to_bytes(), vec![0x00]);
    }

    #[test]
    fn test_checked_narrowing() {
        assert_eq!(checked_u16(65_535), Ok(65_535));
        assert_eq!(
            checked_u16(65_536),
            Err(CodecError::Overflow {
                value: 65_536,
                width: "u16"
            })
        );
        assert_eq!(
            checked_u32(-5),
            Err(CodecError::Negative {
                value: -5,
                width: "u32"
            })
        );
        assert_eq!(checked_u8(255), Ok(255));
        assert!(checked_u8(256).is_err());
    }

    #[test]
    fn test_empty_string_is_single_zero() {
        assert_eq!(String::new().to_bytes(), vec![0x00]);
    }

    #[test]
    fn test_plain_string() {
        assert_eq!("BTS".to_string().to_bytes(), vec![3, b'B', b'T', b'S']);
    }

    #[test]
    fn test_control_character_escaping() {
        assert_eq!(escape_string("a\u{1}b"), b"au0001b".to_vec());
        assert_eq!(escape_string("\u{b}"), b"u000b".to_vec());
        assert_eq!(escape_string("\u{1f}"), b"u001f".to_vec());
        assert_eq!(escape_string("\u{8}\u{c}"), b"bf".to_vec());
        assert_eq!(escape_string("\t\n\r"), b"\t\n\r".to_vec());
        // Length prefix covers the escaped form, not the original.
        assert_eq!("\u{0}".to_string().to_bytes(), b"\x05u0000".to_vec());
    }

    #[test]
    fn test_multibyte_utf8_passes_through() {
        let encoded = "é".to_string().to_bytes();
        assert_eq!(encoded, vec![2, 0xc3, 0xa9]);
    }

    #[test]
    fn test_array_prefix_and_order() {
        let items: Vec<u16> = vec![3, 1, 2];
        assert_eq!(items.to_bytes(), vec![3, 3, 0, 1, 0, 2, 0]);
        assert_eq!(Vec::<u16>::new().to_bytes(), vec![0]);
    }

    #[test]
    fn test_optional_encodings() {
        assert_eq!(None::<u16>.to_bytes(), vec![0x00]);
        assert_eq!(Some(7u16).to_bytes(), vec![0x01, 0x07, 0x00]);
    }

    #[test]
    fn test_optional_with_empty_inner_degrades_to_absent() {
        assert_eq!(Some(()).to_bytes(), None::<()>.to_bytes());
        assert_eq!(Some(()).to_bytes(), vec![0x00]);
    }

    #[test]
    fn test_static_variant() {
        let variant = StaticVariant::new(0, 2000u16);
        assert_eq!(variant.to_bytes(), vec![0x00, 0xd0, 0x07]);
        let variant = StaticVariant::new(130, 1u8);
        assert_eq!(variant.to_bytes(), vec![0x82, 0x01, 0x01]);
    }
}
