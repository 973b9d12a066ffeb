use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("truncated input at offset {offset}: {context}")]
    TruncatedInput { offset: usize, context: &'static str },

    #[error("unsupported wire type {wire_type} at offset {offset}")]
    UnsupportedWireType { wire_type: u8, offset: usize },

    #[error("invalid value for field {field}: {reason}")]
    InvalidValue { field: u64, reason: String },

    /// A ten-byte varint whose last group carries bits above bit 63.
    ///
    /// Such a value cannot be held in a `u64` and re-encoded unchanged, so it
    /// is rejected rather than silently truncated. Protobuf decoders that
    /// discard the excess bits would accept it.
    #[error("varint at offset {offset} overflows 64 bits")]
    VarintOverflow { offset: usize },
}

pub type WireResult<T> = Result<T, WireError>;
