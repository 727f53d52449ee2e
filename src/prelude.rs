//! Prelude

pub use crate::{
    encoding::{decode, encode, encoded_size, Decoder, Encoder, VERSION},
    errors::{ConversionError, DecodeError, EncodeError},
    vecmap::VecMap,
    Bytes, HashMap, Kind, Value,
};
