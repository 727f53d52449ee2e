//! # Bogo
//!
//! Bogo is a self-describing, length-prefixed binary serialization
//! format. Payloads are versioned, every value carries a kind tag, and
//! containers are framed so that any value can be skipped without
//! decoding its interior. That framing is what pays for itself in
//! selective field decoding: a decoder can pull one small field out of an
//! object full of large blobs while touching little more than entry
//! headers.
//!
//! # Example
//!
//! ```
//! use bogo::prelude::*;
//!
//! let mut user = VecMap::new();
//! user.insert(Bytes::from_static(b"name"), Value::from("John"));
//! user.insert(Bytes::from_static(b"age"), Value::from(25i64));
//!
//! let enc = encode(&Value::Object(user)).unwrap();
//! let dec = decode(&enc).unwrap();
//!
//! let obj = dec.to_vecmap().unwrap();
//! assert_eq!(obj.get(b"name".as_slice()).and_then(Value::as_str), Some("John"));
//! assert_eq!(obj.get(b"age".as_slice()).and_then(Value::to_i64), Some(25));
//! ```

/// Bogo binary encoder and decoder.
pub mod encoding;
/// Error types.
pub mod errors;
/// Prelude.
pub mod prelude;
/// Helper macros.
pub mod util;
/// A map wrapper around a sorted vector of pairs.
pub mod vecmap;

pub use bytes::Bytes;
pub use hashbrown::HashMap;

use std::fmt;

use errors::ConversionError;
use vecmap::VecMap;

/// Wire kinds and their canonical tag bytes.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Debug)]
#[repr(u8)]
pub enum Kind {
    Null = 0x00,
    BoolTrue = 0x01,
    BoolFalse = 0x02,
    String = 0x03,
    Byte = 0x04,
    Int = 0x05,
    Uint = 0x06,
    Float = 0x07,
    Blob = 0x08,
    Timestamp = 0x09,
    UntypedList = 0x0a,
    TypedList = 0x0b,
    Object = 0x0c,
}

impl Kind {
    /// The wire tag for this kind.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Looks up the kind for a tag byte.
    pub fn from_tag(tag: u8) -> Option<Kind> {
        match tag {
            0x00 => Some(Kind::Null),
            0x01 => Some(Kind::BoolTrue),
            0x02 => Some(Kind::BoolFalse),
            0x03 => Some(Kind::String),
            0x04 => Some(Kind::Byte),
            0x05 => Some(Kind::Int),
            0x06 => Some(Kind::Uint),
            0x07 => Some(Kind::Float),
            0x08 => Some(Kind::Blob),
            0x09 => Some(Kind::Timestamp),
            0x0a => Some(Kind::UntypedList),
            0x0b => Some(Kind::TypedList),
            0x0c => Some(Kind::Object),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "<null>",
            Kind::BoolTrue => "<bool:true>",
            Kind::BoolFalse => "<bool:false>",
            Kind::String => "<string>",
            Kind::Byte => "<byte>",
            Kind::Int => "<int>",
            Kind::Uint => "<uint>",
            Kind::Float => "<float>",
            Kind::Blob => "<blob>",
            Kind::Timestamp => "<timestamp>",
            Kind::UntypedList => "<list>",
            Kind::TypedList => "<typed_list>",
            Kind::Object => "<object>",
        };
        f.write_str(name)
    }
}

/// Bogo values.
#[derive(Clone, Debug)]
pub enum Value {
    /// Null type. Equivalent to `None`.
    Null,
    /// Boolean type.
    Bool(bool),
    /// A single octet.
    Byte(u8),
    /// Signed 64-bit integer.
    Int(i64),
    /// Unsigned 64-bit integer.
    Uint(u64),
    /// IEEE-754 double.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Arbitrary byte sequence.
    Blob(Bytes),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    /// Sequence of values.
    List(Vec<Value>),
    /// Map of byte-string keys to values.
    Object(VecMap<Bytes, Value>),
    /// Carrier for a kind this build does not recognize, holding the raw
    /// kind byte and the undecoded payload.
    Unknown(u8, Bytes),
}

impl Value {
    /// The wire tag the encoder will write for this value.
    ///
    /// Lists report the untyped tag; the encoder may still pick the
    /// compact typed form when the elements share a kind.
    pub fn tag(&self) -> u8 {
        match self {
            Value::Null => Kind::Null.tag(),
            Value::Bool(true) => Kind::BoolTrue.tag(),
            Value::Bool(false) => Kind::BoolFalse.tag(),
            Value::Byte(_) => Kind::Byte.tag(),
            Value::Int(_) => Kind::Int.tag(),
            Value::Uint(_) => Kind::Uint.tag(),
            Value::Float(_) => Kind::Float.tag(),
            Value::String(_) => Kind::String.tag(),
            Value::Blob(_) => Kind::Blob.tag(),
            Value::Timestamp(_) => Kind::Timestamp.tag(),
            Value::List(_) => Kind::UntypedList.tag(),
            Value::Object(_) => Kind::Object.tag(),
            Value::Unknown(tag, _) => *tag,
        }
    }

    /// The kind of this value, `None` for an unknown-kind carrier.
    pub fn kind(&self) -> Option<Kind> {
        Kind::from_tag(self.tag())
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Blob(_) => "blob",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Unknown(..) => "unknown",
        }
    }

    /// Indicates whether a value is `Null`.
    ///
    /// # Example
    ///
    /// ```
    /// use bogo::Value;
    ///
    /// assert!(Value::Null.is_null());
    /// assert!(!Value::from(0i64).is_null());
    /// ```
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Tries to convert the value to a `bool`.
    ///
    /// # Example
    ///
    /// ```
    /// use bogo::Value;
    ///
    /// assert!(Value::from(true).to_bool().unwrap());
    /// ```
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Tries to convert the value to a single octet.
    pub fn to_byte(&self) -> Option<u8> {
        match self {
            Value::Byte(b) => Some(*b),
            _ => None,
        }
    }

    /// Tries to convert the value to an `i64`.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Tries to convert the value to a `u64`.
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            Value::Uint(u) => Some(*u),
            _ => None,
        }
    }

    /// Tries to convert the value to an `f64`.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Tries to read the value as epoch milliseconds.
    pub fn to_timestamp(&self) -> Option<i64> {
        match self {
            Value::Timestamp(ms) => Some(*ms),
            _ => None,
        }
    }

    /// Borrows the value as a `str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the value as a blob.
    pub fn to_blob(&self) -> Option<&Bytes> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Borrows the value as a list of values.
    ///
    /// # Example
    ///
    /// ```
    /// use bogo::Value;
    ///
    /// let list = Value::from(vec![1i64, 2, 3]);
    /// assert_eq!(list.to_vec().unwrap().len(), 3);
    /// ```
    pub fn to_vec(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Consumes the value, converting it into a list of values.
    pub fn into_vec(self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the value as a `VecMap`.
    pub fn to_vecmap(&self) -> Option<&VecMap<Bytes, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Consumes the value, converting it into a `VecMap`.
    pub fn into_vecmap(self) -> Option<VecMap<Bytes, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Consumes the value, converting it into a `HashMap`.
    ///
    /// # Example
    ///
    /// ```
    /// use bogo::{vecmap::VecMap, Bytes, Value};
    ///
    /// let mut m = VecMap::new();
    /// m.insert(Bytes::from_static(b"foo"), Value::from(1i64));
    ///
    /// let hm = Value::Object(m).into_map().unwrap();
    /// assert_eq!(hm.len(), 1);
    /// ```
    pub fn into_map(self) -> Option<HashMap<Bytes, Value>> {
        Some(self.into_vecmap()?.into_hashmap())
    }

    /// Converts a bytestring literal to a blob value.
    ///
    /// # Example
    ///
    /// ```
    /// use bogo::Value;
    ///
    /// let blob = Value::from_static(b"this is an example");
    /// assert_eq!(blob.to_blob().unwrap().len(), 18);
    /// ```
    pub fn from_static(bytes: &'static [u8]) -> Value {
        Value::Blob(Bytes::from_static(bytes))
    }
}

// floats compare by bit pattern so NaN payloads and signed zeros
// round-trip exactly
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Blob(a), Value::Blob(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Unknown(ta, a), Value::Unknown(tb, b)) => ta == tb && a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

from_fn!(Value, bool, Value::Bool);
from_fn!(Value, u8, Value::Byte);
from_fn!(Value, i64, Value::Int);
from_fn!(Value, u64, Value::Uint);
from_fn!(Value, f64, Value::Float);
from_fn!(Value, String, Value::String);
from_fn!(Value, Bytes, Value::Blob);

from_as!(Value, i8, i64);
from_as!(Value, i16, i64);
from_as!(Value, i32, i64);
from_as!(Value, isize, i64);
from_as!(Value, u16, u64);
from_as!(Value, u32, u64);
from_as!(Value, usize, u64);
from_as!(Value, f32, f64);

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Value {
        Value::List(v.into_iter().map(T::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Value {
        match v {
            None => Value::Null,
            Some(t) => t.into(),
        }
    }
}

impl<T: Into<Value>> From<VecMap<Bytes, T>> for Value {
    fn from(m: VecMap<Bytes, T>) -> Value {
        Value::Object(m.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>, S: std::hash::BuildHasher> From<HashMap<Bytes, T, S>> for Value {
    fn from(m: HashMap<Bytes, T, S>) -> Value {
        Value::Object(m.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

macro_rules! try_from_ctor {
    ($to:ty, $ctor:tt, $expected:expr) => {
        impl TryFrom<Value> for $to {
            type Error = ConversionError;

            fn try_from(from: Value) -> Result<$to, ConversionError> {
                match from {
                    Value::$ctor(a) => Ok(a),
                    f => Err(ConversionError::TypeMismatch {
                        expected: $expected,
                        found: f.type_name(),
                    }),
                }
            }
        }
    };
}

try_from_ctor!(bool, Bool, "bool");
try_from_ctor!(u8, Byte, "byte");
try_from_ctor!(i64, Int, "int");
try_from_ctor!(u64, Uint, "uint");
try_from_ctor!(f64, Float, "float");
try_from_ctor!(String, String, "string");
try_from_ctor!(Bytes, Blob, "blob");
try_from_ctor!(Vec<Value>, List, "list");
try_from_ctor!(VecMap<Bytes, Value>, Object, "object");

macro_rules! try_from_int {
    ($to:ty) => {
        impl TryFrom<Value> for $to {
            type Error = ConversionError;

            fn try_from(from: Value) -> Result<$to, ConversionError> {
                let wide: i128 = match from {
                    Value::Int(i) => i as i128,
                    Value::Uint(u) => u as i128,
                    f => {
                        return Err(ConversionError::TypeMismatch {
                            expected: stringify!($to),
                            found: f.type_name(),
                        })
                    }
                };
                <$to>::try_from(wide).map_err(|_| ConversionError::Overflow {
                    value: wide,
                    target: stringify!($to),
                })
            }
        }
    };
}

try_from_int!(i8);
try_from_int!(i16);
try_from_int!(i32);
try_from_int!(u16);
try_from_int!(u32);
