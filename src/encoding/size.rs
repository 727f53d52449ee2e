//! Element sizing.
//!
//! [`encoded_size`] reports how many bytes an encoded value occupies
//! without decoding its payload. Every container frame and length prefix
//! exists so this computation touches only headers, which is what makes
//! any value in a stream skippable in constant time relative to its
//! payload.

use super::varint::read_uvarint;
use crate::errors::DecodeError;
use crate::Kind;

/// Total encoded length of the value starting at `data[0]`.
///
/// `data` starts at a kind byte; the version byte of a top-level payload
/// is not part of a value.
///
/// # Example
///
/// ```
/// use bogo::prelude::*;
///
/// let bytes = encode(&Value::from("abcd")).unwrap();
/// // past the version byte the payload is one complete value
/// assert_eq!(encoded_size(&bytes[1..]).unwrap() + 1, bytes.len());
/// ```
pub fn encoded_size(data: &[u8]) -> Result<usize, DecodeError> {
    let tag = *data.first().ok_or(DecodeError::InsufficientData {
        context: "kind byte",
        needed: 1,
        remaining: 0,
    })?;
    let kind = Kind::from_tag(tag).ok_or(DecodeError::UnknownKind(tag))?;
    match kind {
        Kind::Null | Kind::BoolTrue | Kind::BoolFalse => Ok(1),
        Kind::Byte => Ok(2),
        Kind::Timestamp => Ok(9),
        Kind::Int | Kind::Uint | Kind::Float => {
            let len = *data.get(1).ok_or(DecodeError::InsufficientData {
                context: "scalar length",
                needed: 2,
                remaining: data.len(),
            })? as usize;
            Ok(2 + len)
        }
        Kind::String | Kind::Blob => {
            let (len, consumed) = read_uvarint(&data[1..], "payload length")?;
            checked_total(len, 1 + consumed, data.len(), "payload length")
        }
        Kind::UntypedList | Kind::TypedList | Kind::Object => {
            let (len, consumed) = read_uvarint(&data[1..], "frame size")?;
            checked_total(len, 1 + consumed, data.len(), "frame size")
        }
    }
}

/// A declared length so large it cannot be addressed is a read past the
/// end of any real input.
fn checked_total(
    len: u64,
    header: usize,
    remaining: usize,
    context: &'static str,
) -> Result<usize, DecodeError> {
    usize::try_from(len)
        .ok()
        .and_then(|len| len.checked_add(header))
        .ok_or(DecodeError::InsufficientData {
            context,
            needed: usize::MAX,
            remaining,
        })
}
