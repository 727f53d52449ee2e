//! # Bogo binary encoder and decoder
//!
//! Encode and decode functions for Bogo payloads.
//!
//! Every top-level payload starts with a version byte followed by one
//! kind-tagged value. Containers carry length-prefixed frames, so any
//! value in a payload can be skipped without decoding its interior; see
//! [`encoded_size`].
//!
//! # Example
//!
//! ```
//! use bogo::prelude::*;
//!
//! let value = Value::from(vec![Value::from(1i64), Value::from("two")]);
//!
//! let enc = encode(&value).unwrap();
//! assert_eq!(enc[0], VERSION);
//!
//! let dec = decode(&enc).unwrap();
//! assert_eq!(dec, value);
//! ```

mod constants;
mod de;
mod ser;
mod size;
mod varint;

pub use constants::VERSION;
pub use de::Decoder;
pub use ser::Encoder;
pub use size::encoded_size;

use crate::errors::{DecodeError, EncodeError};
use crate::Value;

/// Encodes a value with the default options.
///
/// # Example
///
/// ```
/// use bogo::encoding::encode;
/// use bogo::Value;
///
/// let enc = encode(&Value::Null).unwrap();
/// assert_eq!(enc, [0x00, 0x00]);
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    Encoder::new().encode(value)
}

/// Decodes a payload with the default options.
///
/// # Example
///
/// ```
/// use bogo::encoding::{decode, encode};
/// use bogo::Value;
///
/// let enc = encode(&Value::from(true)).unwrap();
/// assert_eq!(decode(&enc).unwrap(), Value::Bool(true));
/// ```
pub fn decode(data: &[u8]) -> Result<Value, DecodeError> {
    Decoder::new().decode(data)
}
