//! Bogo binary encoder.

use std::io::Write;

use bytes::Bytes;

use super::constants::{DEFAULT_MAX_DEPTH, DEFAULT_TAG_NAME, MAX_KEY_LEN, VERSION};
use super::varint::{put_uvarint, put_varint, uvarint_body};
use crate::errors::EncodeError;
use crate::vecmap::VecMap;
use crate::{Kind, Value};

/// Configurable encoder.
///
/// Holds the encoding options plus a per-call depth counter, reset on
/// every [`Encoder::encode`] call. An `Encoder` is cheap to create and
/// must not be shared between concurrent callers; independent callers
/// take independent encoders.
///
/// # Example
///
/// ```
/// use bogo::prelude::*;
///
/// let mut enc = Encoder::new().max_depth(16);
/// let bytes = enc.encode(&Value::from(47i64)).unwrap();
/// assert_eq!(bytes, [0x00, 0x05, 0x01, 0x5e]);
/// ```
#[derive(Clone, Debug)]
pub struct Encoder {
    max_depth: usize,
    strict: bool,
    compact_lists: bool,
    validate_strings: bool,
    tag_name: String,
    depth: usize,
}

impl Default for Encoder {
    fn default() -> Encoder {
        Encoder::new()
    }
}

impl Encoder {
    /// Creates an encoder with the default options.
    pub fn new() -> Encoder {
        Encoder {
            max_depth: DEFAULT_MAX_DEPTH,
            strict: false,
            compact_lists: true,
            validate_strings: true,
            tag_name: DEFAULT_TAG_NAME.to_string(),
            depth: 0,
        }
    }

    /// Caps container nesting. Zero disables the limit.
    pub fn max_depth(mut self, depth: usize) -> Encoder {
        self.max_depth = depth;
        self
    }

    /// Rejects object keys that are not valid UTF-8.
    pub fn strict(mut self, strict: bool) -> Encoder {
        self.strict = strict;
        self
    }

    /// Emits homogeneous lists in the compact typed form. On by default.
    pub fn compact_lists(mut self, compact: bool) -> Encoder {
        self.compact_lists = compact;
        self
    }

    /// Rejects strings containing U+FFFD, which cannot survive a lossy
    /// decode intact. On by default.
    pub fn validate_strings(mut self, validate: bool) -> Encoder {
        self.validate_strings = validate;
        self
    }

    /// Sets the struct tag consumed by the record-mapping layer.
    pub fn tag_name(mut self, tag: impl Into<String>) -> Encoder {
        self.tag_name = tag.into();
        self
    }

    /// The struct tag the record-mapping layer should read.
    pub fn tag(&self) -> &str {
        &self.tag_name
    }

    /// Encodes `value` into a version-prefixed payload.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.depth = 0;
        let mut out = Vec::with_capacity(64);
        out.push(VERSION);
        self.put_value(&mut out, value)?;
        Ok(out)
    }

    /// Encodes `value` and writes the payload to `sink`.
    ///
    /// Returns the number of bytes written.
    pub fn write_to<W: Write>(&mut self, sink: &mut W, value: &Value) -> Result<usize, EncodeError> {
        let data = self.encode(value)?;
        sink.write_all(&data)?;
        Ok(data.len())
    }

    fn put_value(&mut self, out: &mut Vec<u8>, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Null => out.push(Kind::Null.tag()),
            Value::Bool(true) => out.push(Kind::BoolTrue.tag()),
            Value::Bool(false) => out.push(Kind::BoolFalse.tag()),
            Value::Byte(b) => {
                out.push(Kind::Byte.tag());
                out.push(*b);
            }
            Value::Int(i) => {
                out.push(Kind::Int.tag());
                put_varint(out, *i);
            }
            Value::Uint(u) => {
                out.push(Kind::Uint.tag());
                put_uvarint(out, *u);
            }
            Value::Float(f) => {
                out.push(Kind::Float.tag());
                put_float(out, *f);
            }
            Value::String(s) => {
                self.check_string(s)?;
                out.push(Kind::String.tag());
                put_uvarint(out, s.len() as u64);
                out.extend_from_slice(s.as_bytes());
            }
            Value::Blob(b) => {
                out.push(Kind::Blob.tag());
                put_uvarint(out, b.len() as u64);
                out.extend_from_slice(b);
            }
            Value::Timestamp(ms) => {
                out.push(Kind::Timestamp.tag());
                out.extend_from_slice(&ms.to_le_bytes());
            }
            Value::List(items) => self.put_list(out, items)?,
            Value::Object(map) => self.put_object(out, map)?,
            Value::Unknown(tag, raw) => {
                out.push(*tag);
                out.extend_from_slice(raw);
            }
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), EncodeError> {
        self.depth += 1;
        if self.max_depth != 0 && self.depth > self.max_depth {
            return Err(EncodeError::DepthExceeded(self.max_depth));
        }
        Ok(())
    }

    fn put_list(&mut self, out: &mut Vec<u8>, items: &[Value]) -> Result<(), EncodeError> {
        self.enter()?;
        match self.shared_element_kind(items) {
            Some(kind) => self.put_typed_list(out, kind, items)?,
            None => self.put_untyped_list(out, items)?,
        }
        self.depth -= 1;
        Ok(())
    }

    /// The shared element kind when the compact typed form applies.
    ///
    /// Empty lists always take the untyped form.
    fn shared_element_kind(&self, items: &[Value]) -> Option<Kind> {
        if !self.compact_lists || items.is_empty() {
            return None;
        }
        let kind = typed_element_kind(&items[0])?;
        items[1..]
            .iter()
            .all(|v| typed_element_kind(v) == Some(kind))
            .then_some(kind)
    }

    fn put_typed_list(
        &mut self,
        out: &mut Vec<u8>,
        kind: Kind,
        items: &[Value],
    ) -> Result<(), EncodeError> {
        let mut frame = Vec::with_capacity(3 + items.len() * 2);
        frame.push(kind.tag());
        put_uvarint(&mut frame, items.len() as u64);
        for item in items {
            match item {
                Value::Bool(b) => frame.push(*b as u8),
                Value::Byte(b) => frame.push(*b),
                Value::Int(i) => put_varint(&mut frame, *i),
                Value::Uint(u) => put_uvarint(&mut frame, *u),
                Value::Float(f) => put_float(&mut frame, *f),
                Value::String(s) => {
                    self.check_string(s)?;
                    put_uvarint(&mut frame, s.len() as u64);
                    frame.extend_from_slice(s.as_bytes());
                }
                Value::Blob(b) => {
                    put_uvarint(&mut frame, b.len() as u64);
                    frame.extend_from_slice(b);
                }
                Value::Timestamp(ms) => frame.extend_from_slice(&ms.to_le_bytes()),
                _ => unreachable!("elements are screened by shared_element_kind"),
            }
        }
        out.push(Kind::TypedList.tag());
        put_uvarint(out, frame.len() as u64);
        out.extend_from_slice(&frame);
        Ok(())
    }

    fn put_untyped_list(&mut self, out: &mut Vec<u8>, items: &[Value]) -> Result<(), EncodeError> {
        let mut frame = Vec::new();
        for item in items {
            self.put_value(&mut frame, item)?;
        }
        out.push(Kind::UntypedList.tag());
        put_uvarint(out, frame.len() as u64);
        out.extend_from_slice(&frame);
        Ok(())
    }

    fn put_object(
        &mut self,
        out: &mut Vec<u8>,
        map: &VecMap<Bytes, Value>,
    ) -> Result<(), EncodeError> {
        self.enter()?;
        let mut frame = Vec::new();
        let mut scratch = Vec::new();
        for (key, value) in map.iter() {
            if key.len() > MAX_KEY_LEN {
                return Err(EncodeError::KeyTooLong(key.len()));
            }
            if self.strict && std::str::from_utf8(key).is_err() {
                return Err(EncodeError::InvalidUtf8("object key"));
            }
            scratch.clear();
            self.put_value(&mut scratch, value)?;
            let entry_size = 1 + key.len() + scratch.len();
            put_uvarint(&mut frame, entry_size as u64);
            frame.push(key.len() as u8);
            frame.extend_from_slice(key);
            frame.extend_from_slice(&scratch);
        }
        out.push(Kind::Object.tag());
        put_uvarint(out, frame.len() as u64);
        out.extend_from_slice(&frame);
        self.depth -= 1;
        Ok(())
    }

    fn check_string(&self, s: &str) -> Result<(), EncodeError> {
        if self.validate_strings && s.contains('\u{FFFD}') {
            return Err(EncodeError::ReplacementCharacter);
        }
        Ok(())
    }
}

/// Splits a double into its sign/exponent word and mantissa varint.
///
/// Small-magnitude values compress the mantissa down to a few bytes; the
/// payload length byte covers the two sign/exponent bytes plus the
/// mantissa body.
fn put_float(out: &mut Vec<u8>, f: f64) {
    let bits = f.to_bits();
    let sign = (bits >> 63) as u16;
    let exponent = ((bits >> 52) & 0x7ff) as u16;
    let mantissa = bits & 0x000f_ffff_ffff_ffff;

    let sign_exp = (sign << 15) | (exponent & 0x7fff);
    let body = uvarint_body(mantissa);
    out.push((2 + body.len()) as u8);
    out.extend_from_slice(&sign_exp.to_le_bytes());
    out.extend_from_slice(&body);
}

/// The typed-list element kind of a value, when the compact form supports it.
fn typed_element_kind(value: &Value) -> Option<Kind> {
    match value {
        Value::Bool(_) => Some(Kind::BoolTrue),
        Value::Byte(_) => Some(Kind::Byte),
        Value::Int(_) => Some(Kind::Int),
        Value::Uint(_) => Some(Kind::Uint),
        Value::Float(_) => Some(Kind::Float),
        Value::String(_) => Some(Kind::String),
        Value::Blob(_) => Some(Kind::Blob),
        Value::Timestamp(_) => Some(Kind::Timestamp),
        _ => None,
    }
}
