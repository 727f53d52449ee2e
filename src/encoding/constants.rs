/// Version byte written ahead of every top-level value.
pub const VERSION: u8 = 0x00;

/// Longest possible base-128 body for a 64-bit integer.
pub(crate) const MAX_VARINT_LEN: usize = 10;
/// Object key length is carried in a single byte.
pub(crate) const MAX_KEY_LEN: usize = 255;
/// Default nesting limit for encoders and decoders.
pub(crate) const DEFAULT_MAX_DEPTH: usize = 100;
/// Default cumulative decode budget, 10 MiB.
pub(crate) const DEFAULT_MAX_OBJECT_SIZE: usize = 10 * 1024 * 1024;
/// Default struct tag consumed by the record-mapping layer.
pub(crate) const DEFAULT_TAG_NAME: &str = "bogo";
