use thiserror::Error;

/// Errors produced while encoding a value.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Object keys are length-prefixed with a single byte.
    #[error("object key is {0} bytes, the maximum is 255")]
    KeyTooLong(usize),

    /// Container nesting went past the configured limit.
    #[error("nesting depth exceeds the configured maximum of {0}")]
    DepthExceeded(usize),

    /// A key was not valid UTF-8 while strict mode requires it.
    #[error("invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    /// A string contained U+FFFD, which cannot survive a lossy decode.
    #[error("string contains the Unicode replacement character")]
    ReplacementCharacter,

    /// The write adapter failed to flush the payload.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors produced while decoding a payload.
///
/// Every decode failure aborts the call; no partial value is returned.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A length or offset computation would read past the end of the input.
    #[error("insufficient data while reading {context}: need {needed} bytes, {remaining} left")]
    InsufficientData {
        context: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// The version byte did not match while strict mode requires it.
    #[error("unsupported version {0}, expected version 0")]
    UnsupportedVersion(u8),

    /// A kind byte outside the known table, with unknown-kind carriers disabled.
    #[error("unknown kind byte 0x{0:02x}")]
    UnknownKind(u8),

    /// A varint length of zero, above ten, or a body that does not
    /// terminate exactly at its declared length.
    #[error("invalid varint while reading {0}")]
    InvalidVarint(&'static str),

    /// A string or object key was not valid UTF-8 while validation is on.
    #[error("invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    /// Container nesting went past the configured limit.
    #[error("nesting depth exceeds the configured maximum of {0}")]
    DepthExceeded(usize),

    /// The cumulative processed-byte budget ran out.
    #[error("processed {processed} bytes, the configured limit is {limit}")]
    SizeExceeded { processed: usize, limit: usize },

    /// The read adapter failed to drain its source.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors produced when extracting a typed value out of a decoded value.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The value holds a different kind than the requested slot.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The integer does not fit into the requested numeric slot.
    #[error("value {value} does not fit into {target}")]
    Overflow { value: i128, target: &'static str },
}
