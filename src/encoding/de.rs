//! Bogo binary decoder.

use std::io::Read;

use bytes::Bytes;
use hashbrown::HashSet;

use super::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_OBJECT_SIZE, DEFAULT_TAG_NAME, VERSION};
use super::size::encoded_size;
use super::varint::{read_uvarint, read_varint, uvarint_from_body};
use crate::errors::DecodeError;
use crate::vecmap::VecMap;
use crate::{Kind, Value};

/// Configurable decoder.
///
/// Holds the decoding options plus two per-call scratch fields, the
/// nesting depth and the processed-byte accumulator, both reset on every
/// [`Decoder::decode`] call. Not for concurrent use; independent callers
/// take independent decoders.
///
/// # Example
///
/// ```
/// use bogo::prelude::*;
///
/// let bytes = encode(&Value::from("abcd")).unwrap();
/// let mut dec = Decoder::new().strict(true);
/// assert_eq!(dec.decode(&bytes).unwrap(), Value::from("abcd"));
/// ```
#[derive(Clone, Debug)]
pub struct Decoder {
    max_depth: usize,
    strict: bool,
    allow_unknown: bool,
    max_object_size: usize,
    validate_utf8: bool,
    tag_name: String,
    selective: HashSet<Bytes>,
    depth: usize,
    bytes_processed: usize,
}

impl Default for Decoder {
    fn default() -> Decoder {
        Decoder::new()
    }
}

impl Decoder {
    /// Creates a decoder with the default options.
    pub fn new() -> Decoder {
        Decoder {
            max_depth: DEFAULT_MAX_DEPTH,
            strict: false,
            allow_unknown: false,
            max_object_size: DEFAULT_MAX_OBJECT_SIZE,
            validate_utf8: true,
            tag_name: DEFAULT_TAG_NAME.to_string(),
            selective: HashSet::new(),
            depth: 0,
            bytes_processed: 0,
        }
    }

    /// Caps container nesting. Zero disables the limit.
    pub fn max_depth(mut self, depth: usize) -> Decoder {
        self.max_depth = depth;
        self
    }

    /// Rejects unsupported versions and non-UTF-8 object keys.
    pub fn strict(mut self, strict: bool) -> Decoder {
        self.strict = strict;
        self
    }

    /// Turns unrecognized kind bytes into opaque [`Value::Unknown`]
    /// carriers instead of errors.
    pub fn allow_unknown_kinds(mut self, allow: bool) -> Decoder {
        self.allow_unknown = allow;
        self
    }

    /// Caps the bytes examined per call. Zero disables the limit.
    pub fn max_object_size(mut self, limit: usize) -> Decoder {
        self.max_object_size = limit;
        self
    }

    /// Validates string payloads and object keys as UTF-8. On by
    /// default; when off, invalid strings decode lossily and raw keys
    /// pass through untouched.
    pub fn validate_utf8(mut self, validate: bool) -> Decoder {
        self.validate_utf8 = validate;
        self
    }

    /// Sets the struct tag consumed by the record-mapping layer.
    pub fn tag_name(mut self, tag: impl Into<String>) -> Decoder {
        self.tag_name = tag.into();
        self
    }

    /// The struct tag the record-mapping layer should read.
    pub fn tag(&self) -> &str {
        &self.tag_name
    }

    /// Restricts object decoding to the given keys.
    ///
    /// With a non-empty set, every object level decodes only entries
    /// whose key is in the set and advances over the rest by their entry
    /// size, never touching the skipped payload bytes. Keys are literal;
    /// dotted paths carry no meaning.
    pub fn selective_fields<I, K>(mut self, fields: I) -> Decoder
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        self.selective = fields
            .into_iter()
            .map(|k| Bytes::copy_from_slice(k.as_ref()))
            .collect();
        self
    }

    /// Decodes one version-prefixed value from `data`.
    ///
    /// Bytes after the first complete value are ignored.
    pub fn decode(&mut self, data: &[u8]) -> Result<Value, DecodeError> {
        self.depth = 0;
        self.bytes_processed = 0;
        if data.len() < 2 {
            return Err(DecodeError::InsufficientData {
                context: "version and kind",
                needed: 2,
                remaining: data.len(),
            });
        }
        if data[0] != VERSION && self.strict {
            return Err(DecodeError::UnsupportedVersion(data[0]));
        }
        let (value, _) = self.read_value(&data[1..])?;
        Ok(value)
    }

    /// Drains `source` fully, then decodes one value from the buffered
    /// bytes.
    pub fn read_from<R: Read>(&mut self, source: &mut R) -> Result<Value, DecodeError> {
        let mut buf = Vec::new();
        source.read_to_end(&mut buf)?;
        self.decode(&buf)
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        self.depth += 1;
        if self.max_depth != 0 && self.depth > self.max_depth {
            return Err(DecodeError::DepthExceeded(self.max_depth));
        }
        Ok(())
    }

    fn charge(&mut self, count: usize) -> Result<(), DecodeError> {
        self.bytes_processed = self.bytes_processed.saturating_add(count);
        if self.max_object_size != 0 && self.bytes_processed > self.max_object_size {
            return Err(DecodeError::SizeExceeded {
                processed: self.bytes_processed,
                limit: self.max_object_size,
            });
        }
        Ok(())
    }

    /// Decodes the kind-tagged value at the start of `data`, returning it
    /// with the number of bytes consumed.
    fn read_value(&mut self, data: &[u8]) -> Result<(Value, usize), DecodeError> {
        let tag = *data.first().ok_or(DecodeError::InsufficientData {
            context: "kind byte",
            needed: 1,
            remaining: 0,
        })?;
        self.charge(1)?;
        let kind = match Kind::from_tag(tag) {
            Some(kind) => kind,
            // no sizing rule exists for an unknown kind, so the carrier
            // swallows the rest of the slice
            None if self.allow_unknown => {
                self.charge(data.len() - 1)?;
                let raw = Bytes::copy_from_slice(&data[1..]);
                return Ok((Value::Unknown(tag, raw), data.len()));
            }
            None => return Err(DecodeError::UnknownKind(tag)),
        };
        match kind {
            Kind::Null => Ok((Value::Null, 1)),
            Kind::BoolTrue => Ok((Value::Bool(true), 1)),
            Kind::BoolFalse => Ok((Value::Bool(false), 1)),
            Kind::Byte => {
                let b = *data.get(1).ok_or(DecodeError::InsufficientData {
                    context: "byte payload",
                    needed: 2,
                    remaining: data.len(),
                })?;
                self.charge(1)?;
                Ok((Value::Byte(b), 2))
            }
            Kind::Int => {
                let (v, n) = read_varint(&data[1..], "int")?;
                self.charge(n)?;
                Ok((Value::Int(v), 1 + n))
            }
            Kind::Uint => {
                let (v, n) = read_uvarint(&data[1..], "uint")?;
                self.charge(n)?;
                Ok((Value::Uint(v), 1 + n))
            }
            Kind::Float => {
                let (v, n) = read_float(&data[1..])?;
                self.charge(n)?;
                Ok((Value::Float(v), 1 + n))
            }
            Kind::String => {
                let (bytes, n) = self.read_len_prefixed(&data[1..], "string")?;
                let s = self.decode_str(bytes, "string")?;
                Ok((Value::String(s), 1 + n))
            }
            Kind::Blob => {
                let (bytes, n) = self.read_len_prefixed(&data[1..], "blob")?;
                Ok((Value::Blob(Bytes::copy_from_slice(bytes)), 1 + n))
            }
            Kind::Timestamp => {
                let bytes = data.get(1..9).ok_or(DecodeError::InsufficientData {
                    context: "timestamp",
                    needed: 9,
                    remaining: data.len(),
                })?;
                self.charge(8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                Ok((Value::Timestamp(i64::from_le_bytes(raw)), 9))
            }
            Kind::UntypedList => {
                let (v, n) = self.read_list(&data[1..])?;
                Ok((v, 1 + n))
            }
            Kind::TypedList => {
                let (v, n) = self.read_typed_list(&data[1..])?;
                Ok((v, 1 + n))
            }
            Kind::Object => {
                let (v, n) = self.read_object(&data[1..])?;
                Ok((v, 1 + n))
            }
        }
    }

    /// Reads a uvarint length followed by that many payload bytes.
    fn read_len_prefixed<'a>(
        &mut self,
        data: &'a [u8],
        context: &'static str,
    ) -> Result<(&'a [u8], usize), DecodeError> {
        let (len, consumed) = read_uvarint(data, context)?;
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        // saturation is safe: no slice reaches usize::MAX, so an absurd
        // declared length still fails the bounds check below
        let end = consumed.saturating_add(len);
        self.charge(end)?;
        let bytes = data.get(consumed..end).ok_or(DecodeError::InsufficientData {
            context,
            needed: end,
            remaining: data.len(),
        })?;
        Ok((bytes, end))
    }

    fn decode_str(&self, bytes: &[u8], context: &'static str) -> Result<String, DecodeError> {
        if self.validate_utf8 {
            match std::str::from_utf8(bytes) {
                Ok(s) => Ok(s.to_string()),
                Err(_) => Err(DecodeError::InvalidUtf8(context)),
            }
        } else {
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    /// Carves a container frame: a uvarint size, then exactly that many
    /// bytes.
    fn read_frame<'a>(
        &mut self,
        data: &'a [u8],
        context: &'static str,
    ) -> Result<(&'a [u8], usize), DecodeError> {
        let (size, consumed) = read_uvarint(data, context)?;
        let size = usize::try_from(size).unwrap_or(usize::MAX);
        self.charge(consumed)?;
        let end = consumed.saturating_add(size);
        let frame = data.get(consumed..end).ok_or(DecodeError::InsufficientData {
            context,
            needed: end,
            remaining: data.len(),
        })?;
        Ok((frame, end))
    }

    fn read_list(&mut self, data: &[u8]) -> Result<(Value, usize), DecodeError> {
        self.enter()?;
        let (frame, total) = self.read_frame(data, "list frame")?;
        let mut items = Vec::new();
        let mut pos = 0;
        while pos < frame.len() {
            match encoded_size(&frame[pos..]) {
                Ok(size) => {
                    let chunk = frame
                        .get(pos..pos.saturating_add(size))
                        .ok_or(DecodeError::InsufficientData {
                            context: "list element",
                            needed: size,
                            remaining: frame.len() - pos,
                        })?;
                    let (value, _) = self.read_value(chunk)?;
                    items.push(value);
                    pos += size;
                }
                // an unknown element has no sizing rule and swallows the
                // rest of the frame
                Err(DecodeError::UnknownKind(tag)) if self.allow_unknown => {
                    self.charge(frame.len() - pos)?;
                    items.push(Value::Unknown(tag, Bytes::copy_from_slice(&frame[pos + 1..])));
                    pos = frame.len();
                }
                Err(e) => return Err(e),
            }
        }
        self.depth -= 1;
        Ok((Value::List(items), total))
    }

    fn read_typed_list(&mut self, data: &[u8]) -> Result<(Value, usize), DecodeError> {
        self.enter()?;
        let (frame, total) = self.read_frame(data, "typed list frame")?;
        let elem_tag = *frame.first().ok_or(DecodeError::InsufficientData {
            context: "element kind",
            needed: 1,
            remaining: 0,
        })?;
        let (count, consumed) = read_uvarint(&frame[1..], "element count")?;
        self.charge(1 + consumed)?;
        let count = count as usize;
        let bodies = &frame[1 + consumed..];

        let elem_kind = Kind::from_tag(elem_tag).ok_or(DecodeError::UnknownKind(elem_tag))?;
        let mut items = Vec::with_capacity(count.min(bodies.len() + 1));
        match elem_kind {
            Kind::BoolTrue | Kind::BoolFalse => {
                let bytes = fixed_elements(bodies, count, 1, "bool elements")?;
                self.charge(bytes.len())?;
                items.extend(bytes.iter().map(|&b| Value::Bool(b == 1)));
            }
            Kind::Byte => {
                let bytes = fixed_elements(bodies, count, 1, "byte elements")?;
                self.charge(bytes.len())?;
                items.extend(bytes.iter().copied().map(Value::Byte));
            }
            Kind::Timestamp => {
                let bytes = fixed_elements(bodies, count, 8, "timestamp elements")?;
                self.charge(bytes.len())?;
                for chunk in bytes.chunks_exact(8) {
                    let mut raw = [0u8; 8];
                    raw.copy_from_slice(chunk);
                    items.push(Value::Timestamp(i64::from_le_bytes(raw)));
                }
            }
            Kind::Int => {
                let mut pos = 0;
                for _ in 0..count {
                    let (v, n) = read_varint(&bodies[pos..], "int element")?;
                    items.push(Value::Int(v));
                    pos += n;
                }
                self.charge(pos)?;
            }
            Kind::Uint => {
                let mut pos = 0;
                for _ in 0..count {
                    let (v, n) = read_uvarint(&bodies[pos..], "uint element")?;
                    items.push(Value::Uint(v));
                    pos += n;
                }
                self.charge(pos)?;
            }
            Kind::Float => {
                let mut pos = 0;
                for _ in 0..count {
                    let (v, n) = read_float(&bodies[pos..])?;
                    items.push(Value::Float(v));
                    pos += n;
                }
                self.charge(pos)?;
            }
            Kind::String => {
                let mut pos = 0;
                for _ in 0..count {
                    let (bytes, n) = self.read_len_prefixed(&bodies[pos..], "string element")?;
                    let s = self.decode_str(bytes, "string element")?;
                    items.push(Value::String(s));
                    pos += n;
                }
            }
            Kind::Blob => {
                let mut pos = 0;
                for _ in 0..count {
                    let (bytes, n) = self.read_len_prefixed(&bodies[pos..], "blob element")?;
                    items.push(Value::Blob(Bytes::copy_from_slice(bytes)));
                    pos += n;
                }
            }
            _ => return Err(DecodeError::UnknownKind(elem_tag)),
        }
        self.depth -= 1;
        Ok((Value::List(items), total))
    }

    fn read_object(&mut self, data: &[u8]) -> Result<(Value, usize), DecodeError> {
        self.enter()?;
        let (frame, total) = self.read_frame(data, "object frame")?;
        let selective = !self.selective.is_empty();
        let mut entries: Vec<(Bytes, Value)> = Vec::new();
        let mut found: HashSet<Bytes> = HashSet::new();
        let mut pos = 0;
        while pos < frame.len() {
            let (entry_size, consumed) = read_uvarint(&frame[pos..], "entry size")?;
            let entry_size = usize::try_from(entry_size).unwrap_or(usize::MAX);
            let entry = frame
                .get(pos + consumed..(pos + consumed).saturating_add(entry_size))
                .ok_or(DecodeError::InsufficientData {
                    context: "object entry",
                    needed: entry_size,
                    remaining: frame.len() - pos - consumed,
                })?;
            pos += consumed + entry_size;

            let key_len = *entry.first().ok_or(DecodeError::InsufficientData {
                context: "key length",
                needed: 1,
                remaining: 0,
            })? as usize;
            let key = entry
                .get(1..1 + key_len)
                .ok_or(DecodeError::InsufficientData {
                    context: "object key",
                    needed: 1 + key_len,
                    remaining: entry.len(),
                })?;
            self.charge(consumed + 1 + key_len)?;
            if (self.validate_utf8 || self.strict) && std::str::from_utf8(key).is_err() {
                return Err(DecodeError::InvalidUtf8("object key"));
            }
            if selective && !self.selective.contains(key) {
                continue;
            }

            let key = Bytes::copy_from_slice(key);
            // the entry size is authoritative; bytes past the decoded
            // value inside an entry are skipped
            let (value, _) = self.read_value(&entry[1 + key_len..])?;
            if selective {
                found.insert(key.clone());
            }
            entries.push((key, value));
            if selective && found.len() == self.selective.len() {
                break;
            }
        }
        self.depth -= 1;
        Ok((Value::Object(VecMap::from(entries)), total))
    }
}

/// Reassembles a double from its sign/exponent word and mantissa varint.
///
/// The payload length byte must cover exactly the two sign/exponent bytes
/// plus the mantissa body.
fn read_float(data: &[u8]) -> Result<(f64, usize), DecodeError> {
    let len = *data.first().ok_or(DecodeError::InsufficientData {
        context: "float length",
        needed: 1,
        remaining: 0,
    })? as usize;
    if len < 3 {
        return Err(DecodeError::InvalidVarint("float length"));
    }
    let body = data.get(1..1 + len).ok_or(DecodeError::InsufficientData {
        context: "float payload",
        needed: 1 + len,
        remaining: data.len(),
    })?;
    let sign_exp = u16::from_le_bytes([body[0], body[1]]);
    let mantissa = uvarint_from_body(&body[2..], "float mantissa")?;

    let sign = (sign_exp >> 15) as u64;
    let exponent = (sign_exp & 0x7ff) as u64;
    let bits = (sign << 63) | (exponent << 52) | (mantissa & 0x000f_ffff_ffff_ffff);
    Ok((f64::from_bits(bits), 1 + len))
}

/// Carves `count` fixed-width element bodies off the front of `bodies`.
fn fixed_elements<'a>(
    bodies: &'a [u8],
    count: usize,
    width: usize,
    context: &'static str,
) -> Result<&'a [u8], DecodeError> {
    let needed = count.checked_mul(width).unwrap_or(usize::MAX);
    bodies.get(..needed).ok_or(DecodeError::InsufficientData {
        context,
        needed,
        remaining: bodies.len(),
    })
}
