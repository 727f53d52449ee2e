//! Length-prefixed variable-width integers.
//!
//! Every variable-width scalar on the wire is one length byte `L`
//! followed by exactly `L` bytes of standard little-endian base-128
//! continuation encoding. The length byte makes any varint skippable
//! without examining its body. Signed integers go through the zig-zag
//! transform first.

use smallvec::SmallVec;

use super::constants::MAX_VARINT_LEN;
use crate::errors::DecodeError;

pub(crate) type VarintScratch = SmallVec<[u8; MAX_VARINT_LEN]>;

#[inline]
pub(crate) fn zigzag(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

#[inline]
pub(crate) fn unzigzag(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

/// Encode `value` as a bare base-128 body, at most ten bytes.
#[inline]
pub(crate) fn uvarint_body(mut value: u64) -> VarintScratch {
    let mut out = VarintScratch::new();
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            return out;
        }
    }
}

/// Append `L || body` for an unsigned integer.
#[inline]
pub(crate) fn put_uvarint(out: &mut Vec<u8>, value: u64) {
    let body = uvarint_body(value);
    out.push(body.len() as u8);
    out.extend_from_slice(&body);
}

/// Append `L || body` for a zig-zag signed integer.
#[inline]
pub(crate) fn put_varint(out: &mut Vec<u8>, value: i64) {
    put_uvarint(out, zigzag(value));
}

/// Decode a bare base-128 body that must terminate exactly at its end.
pub(crate) fn uvarint_from_body(body: &[u8], context: &'static str) -> Result<u64, DecodeError> {
    if body.is_empty() || body.len() > MAX_VARINT_LEN {
        return Err(DecodeError::InvalidVarint(context));
    }
    let mut value = 0u64;
    for (i, &byte) in body.iter().enumerate() {
        // the tenth byte may only carry the final bit of a 64-bit value
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(DecodeError::InvalidVarint(context));
        }
        value |= ((byte & 0x7f) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            if i + 1 != body.len() {
                return Err(DecodeError::InvalidVarint(context));
            }
            return Ok(value);
        }
    }
    Err(DecodeError::InvalidVarint(context))
}

/// Decode a length-prefixed unsigned varint at the start of `data`.
///
/// Returns the value and the bytes consumed, including the length byte.
pub(crate) fn read_uvarint(data: &[u8], context: &'static str) -> Result<(u64, usize), DecodeError> {
    let len = *data.first().ok_or(DecodeError::InsufficientData {
        context,
        needed: 1,
        remaining: 0,
    })? as usize;
    if len == 0 || len > MAX_VARINT_LEN {
        return Err(DecodeError::InvalidVarint(context));
    }
    let body = data.get(1..1 + len).ok_or(DecodeError::InsufficientData {
        context,
        needed: 1 + len,
        remaining: data.len(),
    })?;
    let value = uvarint_from_body(body, context)?;
    Ok((value, 1 + len))
}

/// Decode a length-prefixed zig-zag signed varint.
pub(crate) fn read_varint(data: &[u8], context: &'static str) -> Result<(i64, usize), DecodeError> {
    let (u, n) = read_uvarint(data, context)?;
    Ok((unzigzag(u), n))
}
