//! Schema-free wire codec for user dictionary storage files.
//!
//! The format is the protocol-buffer tag/value encoding restricted to the
//! four non-group wire types. Decoding needs no schema: every field comes
//! back as a [`Field`] whose value shape is fixed by its [`WireType`], and
//! encoding a decoded sequence reproduces the source bytes exactly.
//!
//! # Wire types
//!
//! | bits | type | value |
//! |---|---|---|
//! | 0 | varint | base-128 integer, at most 10 bytes |
//! | 1 | fixed64 | 8 raw bytes |
//! | 2 | length-delimited | varint length, then that many bytes |
//! | 5 | fixed32 | 4 raw bytes |

pub mod codec;
pub mod error;
pub mod field;
pub mod varint;

pub use codec::{decode, encode, encode_field, FieldReader, MAX_FIELD_NUMBER};
pub use error::{WireError, WireResult};
pub use field::{Field, FieldValue, WireType};
pub use varint::{decode_varint, encode_varint, MAX_VARINT_LEN};
